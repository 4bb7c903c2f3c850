//! Homepage hero carousel editor.
//!
//! The editor posts the whole slide array on every action. "Add" and
//! "remove" only change what is shown; "save" fills empty fields from the
//! linked products, writes the file and publishes it to GitHub when
//! configured.
//!
//! Form fields are named `slide-{index}-{field}`, for example
//! `slide-0-product_id`.

use std::collections::BTreeMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::instrument;
use watchpost_core::{HeroSlide, HeroTheme, Product, missing_products};

use crate::filters;
use crate::state::AppState;

/// Dropdown choice.
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// One slide as shown in the editor.
pub struct SlideView {
    pub index: usize,
    pub id: String,
    pub products: Vec<SelectOption>,
    pub themes: Vec<SelectOption>,
    pub title: String,
    pub description: String,
    pub brand_logo: String,
    pub image: String,
}

impl SlideView {
    fn new(index: usize, slide: &HeroSlide, products: &[Product]) -> Self {
        let mut product_options: Vec<SelectOption> = products
            .iter()
            .map(|p| SelectOption {
                value: p.id.clone(),
                label: p.name.clone(),
                selected: p.id == slide.product_id,
            })
            .collect();
        // Unknown products stay selected
        if !slide.product_id.is_empty() && !product_options.iter().any(|o| o.selected) {
            product_options.insert(
                0,
                SelectOption {
                    value: slide.product_id.clone(),
                    label: format!("{} (not in catalog)", slide.product_id),
                    selected: true,
                },
            );
        }

        Self {
            index,
            id: slide.id.clone(),
            products: product_options,
            themes: HeroTheme::ALL
                .iter()
                .map(|t| SelectOption {
                    value: t.as_str().to_string(),
                    label: t.as_str().to_string(),
                    selected: *t == slide.theme,
                })
                .collect(),
            title: slide.custom_title.clone().unwrap_or_default(),
            description: slide.custom_description.clone().unwrap_or_default(),
            brand_logo: slide.brand_logo.clone(),
            image: slide.image.clone(),
        }
    }
}

/// Hero editor template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/hero.html")]
pub struct HeroEditorTemplate {
    pub slides: Vec<SlideView>,
    pub missing: Vec<String>,
    pub notice: Option<String>,
    pub warning: Option<String>,
    pub error: Option<String>,
}

/// Editor action chosen by the submit button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAction {
    Save,
    Add,
    Remove(String),
}

impl EditorAction {
    fn parse(value: Option<&str>) -> Self {
        match value {
            Some("add") => Self::Add,
            Some(v) => v
                .strip_prefix("remove:")
                .map_or(Self::Save, |id| Self::Remove(id.to_string())),
            None => Self::Save,
        }
    }
}

fn optional(value: &str) -> Option<String> {
    Some(value.trim())
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// Rebuild the slide array from submitted form pairs, in index order.
///
/// Returns the slides and the `action` value, if any.
pub fn parse_slides(pairs: &[(String, String)]) -> (Vec<HeroSlide>, EditorAction) {
    let mut slides: BTreeMap<usize, HeroSlide> = BTreeMap::new();
    let mut action = None;

    for (key, value) in pairs {
        if key == "action" {
            action = Some(value.as_str());
            continue;
        }

        let Some((index, field)) = key
            .strip_prefix("slide-")
            .and_then(|rest| rest.split_once('-'))
            .and_then(|(i, field)| i.parse::<usize>().ok().map(|i| (i, field)))
        else {
            continue;
        };

        let slide = slides.entry(index).or_insert_with(|| HeroSlide::new(""));
        match field {
            "id" if !value.trim().is_empty() => slide.id = value.trim().to_string(),
            "product_id" => slide.product_id = value.trim().to_string(),
            "theme" => slide.theme = HeroTheme::from_str_or_default(value),
            "custom_title" => slide.custom_title = optional(value),
            "custom_description" => slide.custom_description = optional(value),
            "brand_logo" => slide.brand_logo = value.trim().to_string(),
            "image" => slide.image = value.trim().to_string(),
            _ => {}
        }
    }

    (slides.into_values().collect(), EditorAction::parse(action))
}

#[derive(Default)]
struct Messages {
    notice: Option<String>,
    warning: Option<String>,
    error: Option<String>,
}

fn editor_page(slides: &[HeroSlide], products: &[Product], messages: Messages) -> HeroEditorTemplate {
    HeroEditorTemplate {
        slides: slides
            .iter()
            .enumerate()
            .map(|(i, s)| SlideView::new(i, s, products))
            .collect(),
        missing: missing_products(slides, products)
            .into_iter()
            .map(|s| s.product_id.clone())
            .collect(),
        notice: messages.notice,
        warning: messages.warning,
        error: messages.error,
    }
}

/// Show the editor.
///
/// GET /admin/hero
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Response {
    let products = state.inventory().products().await;
    match state.hero().load().await {
        Ok(slides) => editor_page(&slides, &products, Messages::default()).into_response(),
        Err(e) => {
            tracing::error!(error = %e, path = %state.hero().path().display(), "Failed to load hero slides");
            let messages = Messages {
                error: Some(format!("Could not read the hero file: {e}")),
                ..Messages::default()
            };
            (StatusCode::INTERNAL_SERVER_ERROR, editor_page(&[], &products, messages)).into_response()
        }
    }
}

/// Apply an editor action.
///
/// POST /admin/hero
#[instrument(skip(state, pairs))]
pub async fn submit(State(state): State<AppState>, Form(pairs): Form<Vec<(String, String)>>) -> Response {
    let products = state.inventory().products().await;
    let (mut slides, action) = parse_slides(&pairs);

    match action {
        EditorAction::Add => {
            let mut slide = HeroSlide::new("");
            if let Some(product) = products.first() {
                slide.select_product(product);
            }
            slides.push(slide);
            let messages = Messages {
                notice: Some("Slide added. Save to publish it.".to_string()),
                ..Messages::default()
            };
            editor_page(&slides, &products, messages).into_response()
        }
        EditorAction::Remove(id) => {
            slides.retain(|s| s.id != id);
            let messages = Messages {
                notice: Some("Slide removed. Save to publish the change.".to_string()),
                ..Messages::default()
            };
            editor_page(&slides, &products, messages).into_response()
        }
        EditorAction::Save => match state.hero().save(&mut slides, &products).await {
            Ok(outcome) => {
                let notice = outcome.commit.as_deref().map_or_else(
                    || "Hero slides saved.".to_string(),
                    |sha| format!("Hero slides saved and published ({}).", short_sha(sha)),
                );
                let messages = Messages {
                    notice: Some(notice),
                    warning: outcome.warning,
                    error: None,
                };
                editor_page(&slides, &products, messages).into_response()
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to save hero slides");
                let messages = Messages {
                    error: Some(format!("Could not save hero slides: {e}")),
                    ..Messages::default()
                };
                (StatusCode::INTERNAL_SERVER_ERROR, editor_page(&slides, &products, messages))
                    .into_response()
            }
        },
    }
}

fn short_sha(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}

/// Build the hero editor router.
pub fn router() -> Router<AppState> {
    Router::new().route("/admin/hero", get(show).post(submit))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_parse_slides_in_index_order() {
        let (slides, action) = parse_slides(&pairs(&[
            ("slide-1-id", "b"),
            ("slide-1-product_id", "wp-nvr-8ch"),
            ("slide-0-id", "a"),
            ("slide-0-product_id", "wp-cam-4mp-turret"),
            ("slide-0-theme", "blue"),
            ("slide-0-custom_title", "  "),
            ("slide-0-custom_description", "Sharp at night"),
        ]));

        assert_eq!(action, EditorAction::Save);
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0].id, "a");
        assert_eq!(slides[0].theme, HeroTheme::Blue);
        assert_eq!(slides[0].custom_title, None);
        assert_eq!(slides[0].custom_description.as_deref(), Some("Sharp at night"));
        assert_eq!(slides[1].product_id, "wp-nvr-8ch");
    }

    #[test]
    fn test_parse_actions() {
        assert_eq!(parse_slides(&pairs(&[("action", "add")])).1, EditorAction::Add);
        assert_eq!(
            parse_slides(&pairs(&[("action", "remove:abc")])).1,
            EditorAction::Remove("abc".to_string())
        );
        assert_eq!(parse_slides(&pairs(&[("action", "save")])).1, EditorAction::Save);
    }

    #[test]
    fn test_ignores_unrelated_fields() {
        let (slides, _) = parse_slides(&pairs(&[("slide-x-id", "a"), ("csrf", "1")]));
        assert!(slides.is_empty());
    }

    #[test]
    fn test_blank_id_keeps_generated_one() {
        let (slides, _) = parse_slides(&pairs(&[("slide-0-id", ""), ("slide-0-product_id", "p")]));
        assert!(!slides[0].id.is_empty());
    }

    #[test]
    fn test_unknown_product_stays_selected() {
        let slide = HeroSlide::new("retired-camera");
        let view = SlideView::new(0, &slide, watchpost_core::catalog::products());
        let selected: Vec<_> = view.products.iter().filter(|o| o.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].value, "retired-camera");
    }

    #[test]
    fn test_short_sha() {
        assert_eq!(short_sha("0123456789abcdef"), "0123456");
        assert_eq!(short_sha("abc"), "abc");
    }
}
