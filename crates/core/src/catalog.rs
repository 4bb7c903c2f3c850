//! Static product catalog.
//!
//! Served whenever the inventory provider is unconfigured or unreachable,
//! and used as the seed data pushed into the provider by `wp-cli seed`.

use std::sync::LazyLock;

use crate::types::{Price, Product, Subcategory};

/// Placeholder image for products without a picture.
pub const PLACEHOLDER_IMAGE: &str = "/static/images/placeholder.svg";

struct Entry {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    cents: i64,
    subcategory: Subcategory,
    image: &'static str,
    features: &'static [&'static str],
    in_stock: bool,
    brand: Option<(&'static str, &'static str)>,
}

const ENTRIES: &[Entry] = &[
    Entry {
        id: "wp-cam-4mp-turret",
        name: "4MP AcuSense Turret Camera",
        description: "Weatherproof turret camera with human and vehicle detection, ideal for entrances and driveways.",
        cents: 14_900,
        subcategory: Subcategory::IpCameras,
        image: "/static/images/products/turret-4mp.svg",
        features: &[
            "4MP resolution at 30 fps",
            "30 m infrared night vision",
            "Human and vehicle classification",
            "IP67 weatherproof housing",
            "Power over Ethernet",
        ],
        in_stock: true,
        brand: Some(("Hikvision", "/static/images/brands/hikvision.svg")),
    },
    Entry {
        id: "wp-cam-8mp-bullet",
        name: "8MP 4K Bullet Camera",
        description: "Long-range 4K bullet camera for perimeters, parking lots and large yards.",
        cents: 21_900,
        subcategory: Subcategory::IpCameras,
        image: "/static/images/products/bullet-8mp.svg",
        features: &[
            "4K Ultra HD sensor",
            "2.8-12 mm motorized varifocal lens",
            "60 m infrared range",
            "Smart motion detection",
        ],
        in_stock: true,
        brand: Some(("Dahua", "/static/images/brands/dahua.svg")),
    },
    Entry {
        id: "wp-cam-5mp-dome-analog",
        name: "5MP HD-TVI Dome Camera",
        description: "Vandal-resistant analog dome that upgrades existing coax installations without rewiring.",
        cents: 6_900,
        subcategory: Subcategory::AnalogCameras,
        image: "/static/images/products/dome-analog-5mp.svg",
        features: &[
            "Works over existing coaxial cable",
            "IK10 vandal resistant",
            "20 m infrared night vision",
        ],
        in_stock: true,
        brand: Some(("Hikvision", "/static/images/brands/hikvision.svg")),
    },
    Entry {
        id: "wp-cam-ptz-25x",
        name: "4MP 25x PTZ Camera",
        description: "Pan-tilt-zoom camera with auto tracking for open areas that need an operator's eye.",
        cents: 89_900,
        subcategory: Subcategory::PtzCameras,
        image: "/static/images/products/ptz-25x.svg",
        features: &[
            "25x optical zoom",
            "360 degree endless pan",
            "Automatic subject tracking",
            "150 m infrared range",
        ],
        in_stock: false,
        brand: Some(("Dahua", "/static/images/brands/dahua.svg")),
    },
    Entry {
        id: "wp-nvr-16ch",
        name: "16 Channel 4K PoE NVR",
        description: "Network video recorder with 16 built-in PoE ports and room for two surveillance drives.",
        cents: 54_900,
        subcategory: Subcategory::Nvr,
        image: "/static/images/products/nvr-16ch.svg",
        features: &[
            "16 PoE ports",
            "Records up to 12MP",
            "2 SATA bays, up to 20 TB each",
            "Remote viewing app",
        ],
        in_stock: true,
        brand: Some(("Hikvision", "/static/images/brands/hikvision.svg")),
    },
    Entry {
        id: "wp-dvr-8ch",
        name: "8 Channel 5MP DVR",
        description: "Hybrid DVR for analog camera systems with support for two IP cameras.",
        cents: 27_900,
        subcategory: Subcategory::Dvr,
        image: "/static/images/products/dvr-8ch.svg",
        features: &["8 analog + 2 IP channels", "H.265+ compression", "1 SATA bay"],
        in_stock: true,
        brand: Some(("Dahua", "/static/images/brands/dahua.svg")),
    },
    Entry {
        id: "wp-hdd-4tb",
        name: "4TB Surveillance Hard Drive",
        description: "Drive built for 24/7 recording workloads in NVRs and DVRs.",
        cents: 11_900,
        subcategory: Subcategory::Storage,
        image: "/static/images/products/hdd-4tb.svg",
        features: &["Rated for 24/7 operation", "Supports up to 64 cameras", "3 year warranty"],
        in_stock: true,
        brand: Some(("Seagate", "/static/images/brands/seagate.svg")),
    },
    Entry {
        id: "wp-cable-cat6-1000",
        name: "Cat6 Outdoor Cable, 1000 ft",
        description: "Direct-burial rated Cat6 cable for PoE camera runs.",
        cents: 18_900,
        subcategory: Subcategory::Cables,
        image: "/static/images/products/cat6-1000.svg",
        features: &["23 AWG solid copper", "UV resistant jacket", "Direct burial rated"],
        in_stock: true,
        brand: None,
    },
    Entry {
        id: "wp-psu-8port",
        name: "8 Port PoE Switch",
        description: "Unmanaged PoE+ switch to power and connect up to eight IP cameras.",
        cents: 12_900,
        subcategory: Subcategory::PowerSupplies,
        image: "/static/images/products/poe-switch-8.svg",
        features: &["120 W PoE budget", "Extended 250 m mode", "Fanless"],
        in_stock: true,
        brand: None,
    },
    Entry {
        id: "wp-mount-junction",
        name: "Junction Box Mount",
        description: "Weatherproof junction box that hides connectors behind turret and dome cameras.",
        cents: 2_900,
        subcategory: Subcategory::Mounts,
        image: "/static/images/products/junction-box.svg",
        features: &["Aluminium alloy", "Fits most turret and dome cameras"],
        in_stock: true,
        brand: Some(("Hikvision", "/static/images/brands/hikvision.svg")),
    },
    Entry {
        id: "wp-kit-4cam",
        name: "4 Camera Home Security Kit",
        description: "Four 4MP turret cameras, an 8 channel NVR with a 2TB drive, and cabling. Installation available.",
        cents: 99_900,
        subcategory: Subcategory::CompleteKits,
        image: "/static/images/products/kit-4cam.svg",
        features: &[
            "4 x 4MP turret cameras",
            "8 channel PoE NVR with 2 TB drive",
            "4 x 60 ft pre-made cables",
            "Free remote setup",
        ],
        in_stock: true,
        brand: Some(("Hikvision", "/static/images/brands/hikvision.svg")),
    },
];

static CATALOG: LazyLock<Vec<Product>> = LazyLock::new(|| {
    ENTRIES
        .iter()
        .map(|entry| Product {
            id: entry.id.to_string(),
            name: entry.name.to_string(),
            description: entry.description.to_string(),
            price: Price::from_cents(entry.cents),
            category: entry.subcategory.category(),
            subcategory: entry.subcategory,
            image: entry.image.to_string(),
            features: entry.features.iter().map(|f| (*f).to_string()).collect(),
            in_stock: entry.in_stock,
            brand: entry.brand.map(|(name, _)| name.to_string()),
            brand_logo: entry.brand.map(|(_, logo)| logo.to_string()),
        })
        .collect()
});

/// The static product list.
#[must_use]
pub fn products() -> &'static [Product] {
    &CATALOG
}

/// Look up a static product by identifier.
#[must_use]
pub fn product(id: &str) -> Option<&'static Product> {
    CATALOG.iter().find(|p| p.id == id)
}
