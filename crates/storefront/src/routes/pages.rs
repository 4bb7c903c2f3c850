//! Marketing and policy page route handlers.
//!
//! About, services and process are fixed templates. Policy pages (privacy,
//! terms, shipping, returns, warranty) are markdown files served by slug.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/about.html")]
pub struct AboutTemplate {
    pub years_in_business: u32,
}

/// One installation service offered.
pub struct ServiceView {
    pub title: &'static str,
    pub summary: &'static str,
}

/// Services page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/services.html")]
pub struct ServicesTemplate {
    pub services: &'static [ServiceView],
}

/// One step of the installation process.
pub struct StepView {
    pub title: &'static str,
    pub detail: &'static str,
}

/// Process page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/process.html")]
pub struct ProcessTemplate {
    pub steps: &'static [StepView],
}

/// Policy page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/policy.html")]
pub struct PolicyTemplate {
    pub title: String,
    pub description: String,
    pub updated_at: Option<NaiveDate>,
    pub content_html: String,
}

const FOUNDED: i32 = 2009;

const SERVICES: &[ServiceView] = &[
    ServiceView {
        title: "Residential CCTV",
        summary: "Doorbell, driveway and perimeter coverage with remote viewing on your phone.",
    },
    ServiceView {
        title: "Commercial systems",
        summary: "Multi-site IP camera networks, NVR storage and access for your whole team.",
    },
    ServiceView {
        title: "Upgrades and repairs",
        summary: "Replace ageing analog cameras or recorders without rewiring the building.",
    },
    ServiceView {
        title: "Maintenance plans",
        summary: "Annual health checks, firmware updates and priority call-outs.",
    },
];

const STEPS: &[StepView] = &[
    StepView {
        title: "Site survey",
        detail: "We walk the property, map blind spots and agree what each camera must see.",
    },
    StepView {
        title: "Design and quote",
        detail: "A fixed-price proposal with camera placement, storage sizing and cabling plan.",
    },
    StepView {
        title: "Installation",
        detail: "Certified technicians install, cable and configure everything, usually in a day.",
    },
    StepView {
        title: "Handover",
        detail: "We set up the mobile app, walk you through playback and leave written notes.",
    },
    StepView {
        title: "Support",
        detail: "Warranty on parts and labour, plus remote help whenever you need it.",
    },
];

/// Display the About page.
pub async fn about() -> impl IntoResponse {
    use chrono::Datelike;
    let years = chrono::Utc::now().year() - FOUNDED;
    AboutTemplate {
        years_in_business: u32::try_from(years).unwrap_or_default(),
    }
}

/// Display the Services page.
pub async fn services() -> impl IntoResponse {
    ServicesTemplate { services: SERVICES }
}

/// Display the Process page.
pub async fn process() -> impl IntoResponse {
    ProcessTemplate { steps: STEPS }
}

/// Display a policy page by slug.
///
/// # Errors
///
/// Returns 404 if the page doesn't exist.
#[instrument(skip(state))]
pub async fn policy(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let page = state
        .content()
        .get_page(&slug)
        .ok_or_else(|| AppError::NotFound(format!("Page {slug}")))?;

    Ok(PolicyTemplate {
        title: page.meta.title.clone(),
        description: page.meta.description.clone().unwrap_or_default(),
        updated_at: page.meta.updated_at,
        content_html: page.content_html.clone(),
    })
}

/// Create the pages routes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/about", get(about))
        .route("/services", get(services))
        .route("/process", get(process))
        .route("/policies/{slug}", get(policy))
}
