//! Marketing sections: hero, about, store info and social links.
//!
//! Hero and about live in `site_content`, one row per `section`. Store info
//! is the single `store_info` row; social links are ordered by `sort_order`.

use serde::Deserialize;

use super::ContentSlice;
use crate::gateway::{Direction, GatewayError, Query, Row, decode_row, decode_rows};
use crate::views::SectionView;

const SITE_CONTENT: &str = "site_content";

/// One `site_content` row. `metadata` holds per-section extras and may be
/// missing or null.
#[derive(Debug, Deserialize)]
struct SiteContentRow {
    title: String,
    #[serde(default)]
    subtitle: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    metadata: Option<AboutMetadata>,
}

#[derive(Debug, Default, Deserialize)]
struct AboutMetadata {
    #[serde(default)]
    features: Vec<Feature>,
    #[serde(default)]
    mission: Option<String>,
}

fn site_content_query(section: &str) -> Query {
    Query::table(SITE_CONTENT).eq("section", section).limit(1)
}

fn first_row(rows: Vec<Row>) -> Result<Option<SiteContentRow>, GatewayError> {
    rows.into_iter().next().map(decode_row).transpose()
}

// =============================================================================
// Hero
// =============================================================================

/// Landing banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hero {
    pub title: String,
    pub subtitle: Option<String>,
    pub body: String,
    pub image_url: Option<String>,
}

impl ContentSlice for Hero {
    const SECTION: &'static str = "hero";

    fn query() -> Query {
        site_content_query(Self::SECTION)
    }

    fn decode(rows: Vec<Row>) -> Result<Option<Self>, GatewayError> {
        Ok(first_row(rows)?.map(|row| Self {
            title: row.title,
            subtitle: row.subtitle,
            body: row.content.unwrap_or_default(),
            image_url: row.image_url,
        }))
    }

    fn fallback() -> Self {
        Self {
            title: "Sweet Dreams".to_string(),
            subtitle: Some("Artisanal Confections".to_string()),
            body: "Indulge in our handcrafted collection of premium sweets, chocolates, and \
                   confections. Made with the finest ingredients and traditional techniques \
                   passed down through generations."
                .to_string(),
            image_url: Some("/assets/hero-sweets.jpg".to_string()),
        }
    }

    fn render(&self) -> SectionView {
        let mut lines = Vec::new();
        lines.extend(self.subtitle.clone());
        lines.push(self.body.clone());
        SectionView::new(&self.title, lines)
    }
}

// =============================================================================
// About
// =============================================================================

/// One highlight in the about section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Feature {
    pub title: String,
    pub description: String,
}

/// The shop's story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct About {
    pub title: String,
    pub paragraphs: Vec<String>,
    pub features: Vec<Feature>,
    pub mission: Option<String>,
}

/// Split on blank lines, dropping empty paragraphs.
fn paragraphs(content: &str) -> Vec<String> {
    content
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

impl ContentSlice for About {
    const SECTION: &'static str = "about";

    fn query() -> Query {
        site_content_query(Self::SECTION)
    }

    fn decode(rows: Vec<Row>) -> Result<Option<Self>, GatewayError> {
        Ok(first_row(rows)?.map(|row| {
            let metadata = row.metadata.unwrap_or_default();
            Self {
                title: row.title,
                paragraphs: row.content.as_deref().map(paragraphs).unwrap_or_default(),
                features: metadata.features,
                mission: metadata.mission,
            }
        }))
    }

    fn fallback() -> Self {
        let feature = |title: &str, description: &str| Feature {
            title: title.to_string(),
            description: description.to_string(),
        };

        Self {
            title: "Three Generations of Sweet Perfection".to_string(),
            paragraphs: vec![
                "Founded in 1952 by Grandma Rose, Sweet Dreams began as a small neighborhood \
                 bakery with a simple mission: to bring joy to people's lives through \
                 exceptional confections."
                    .to_string(),
                "Today, we continue her legacy using the same time-honored recipes and \
                 traditional techniques, while incorporating modern innovations to create the \
                 perfect balance of nostalgia and contemporary taste."
                    .to_string(),
                "Every macaron, chocolate, and sweet treat that leaves our kitchen carries with \
                 it the love, care, and expertise that has been refined over seven decades."
                    .to_string(),
            ],
            features: vec![
                feature(
                    "Made with Love",
                    "Every sweet is handcrafted with passion and attention to detail by our \
                     skilled artisans.",
                ),
                feature(
                    "Premium Quality",
                    "We use only the finest ingredients sourced from trusted suppliers around \
                     the world.",
                ),
                feature(
                    "Family Tradition",
                    "Our recipes have been passed down through three generations of \
                     confectionery masters.",
                ),
                feature(
                    "Fresh Daily",
                    "All our products are made fresh daily to ensure the perfect taste and \
                     texture.",
                ),
            ],
            mission: Some(
                "To create moments of pure joy through exceptional confections that celebrate \
                 life's sweetest moments, while preserving the artisanal traditions that make \
                 each treat a work of edible art."
                    .to_string(),
            ),
        }
    }

    fn render(&self) -> SectionView {
        let mut lines = self.paragraphs.clone();
        lines.extend(
            self.features
                .iter()
                .map(|f| format!("{}: {}", f.title, f.description)),
        );
        if let Some(mission) = &self.mission {
            lines.push(format!("Our Mission: {mission}"));
        }
        SectionView::new(&self.title, lines)
    }
}

// =============================================================================
// Store info
// =============================================================================

/// Opening hours for a day or range of days.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OpeningHours {
    pub day: String,
    pub time: String,
}

/// Where and when to find the shop.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreInfo {
    pub address: String,
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub hours: Vec<OpeningHours>,
}

impl ContentSlice for StoreInfo {
    const SECTION: &'static str = "store_info";

    fn query() -> Query {
        Query::table("store_info").limit(1)
    }

    fn decode(rows: Vec<Row>) -> Result<Option<Self>, GatewayError> {
        rows.into_iter().next().map(decode_row).transpose()
    }

    fn fallback() -> Self {
        let hours = |day: &str, time: &str| OpeningHours {
            day: day.to_string(),
            time: time.to_string(),
        };

        Self {
            address: "123 Sweet Street, Confection City, CC 12345".to_string(),
            phone: "+1 (555) 123-SWEET".to_string(),
            email: "hello@sweetdreams.com".to_string(),
            hours: vec![
                hours("Monday - Friday", "8:00 AM - 8:00 PM"),
                hours("Saturday", "9:00 AM - 9:00 PM"),
                hours("Sunday", "10:00 AM - 6:00 PM"),
            ],
        }
    }

    fn render(&self) -> SectionView {
        let mut lines = vec![
            format!("Visit Our Shop: {}", self.address),
            format!("Call Us: {}", self.phone),
            format!("Email Us: {}", self.email),
        ];
        lines.extend(self.hours.iter().map(|h| format!("{}: {}", h.day, h.time)));
        SectionView::new("Store Information", lines)
    }
}

// =============================================================================
// Social links
// =============================================================================

const DEFAULT_HANDLE: &str = "@sweetdreamsbakery";

#[derive(Debug, Deserialize)]
struct SocialLinkRow {
    platform: String,
    url: String,
    #[serde(default)]
    handle: Option<String>,
}

/// One social profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

/// The shop's social profiles in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialLinks {
    pub handle: String,
    pub links: Vec<SocialLink>,
}

impl ContentSlice for SocialLinks {
    const SECTION: &'static str = "social_links";

    fn query() -> Query {
        Query::table("social_links").order("sort_order", Direction::Ascending)
    }

    fn decode(rows: Vec<Row>) -> Result<Option<Self>, GatewayError> {
        let rows: Vec<SocialLinkRow> = decode_rows(Self::SECTION, rows);
        if rows.is_empty() {
            return Ok(None);
        }

        let handle = rows
            .iter()
            .find_map(|row| row.handle.clone())
            .unwrap_or_else(|| DEFAULT_HANDLE.to_string());
        let links = rows
            .into_iter()
            .map(|row| SocialLink {
                platform: row.platform,
                url: row.url,
            })
            .collect();
        Ok(Some(Self { handle, links }))
    }

    fn fallback() -> Self {
        let link = |platform: &str, host: &str| SocialLink {
            platform: platform.to_string(),
            url: format!("https://{host}/sweetdreamsbakery"),
        };

        Self {
            handle: DEFAULT_HANDLE.to_string(),
            links: vec![
                link("Facebook", "facebook.com"),
                link("Instagram", "instagram.com"),
                link("Twitter", "twitter.com"),
                link("Pinterest", "pinterest.com"),
            ],
        }
    }

    fn render(&self) -> SectionView {
        let mut lines = vec![format!("Follow {}", self.handle)];
        lines.extend(
            self.links
                .iter()
                .map(|link| format!("{}: {}", link.platform, link.url)),
        );
        SectionView::new("Follow Us", lines)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_hero_decodes_first_row() {
        let hero = Hero::decode(vec![json!({
            "section": "hero",
            "title": "Sweet Dreams",
            "subtitle": null,
            "content": "Now open on Sundays."
        })])
        .unwrap()
        .unwrap();

        assert_eq!(hero.body, "Now open on Sundays.");
        assert_eq!(hero.subtitle, None);
    }

    #[test]
    fn test_null_metadata_still_decodes() {
        let hero = Hero::decode(vec![json!({
            "section": "hero",
            "title": "Spring Sale",
            "content": "Everything half off.",
            "metadata": null
        })])
        .unwrap()
        .unwrap();
        assert_eq!(hero.title, "Spring Sale");

        let about = About::decode(vec![json!({
            "section": "about",
            "title": "Our Story",
            "content": "Since 1952.",
            "metadata": null
        })])
        .unwrap()
        .unwrap();
        assert!(about.features.is_empty());
        assert_eq!(about.mission, None);
    }

    #[test]
    fn test_hero_without_rows_is_empty() {
        assert_eq!(Hero::decode(Vec::new()).unwrap(), None);
    }

    #[test]
    fn test_hero_without_title_is_error() {
        assert!(Hero::decode(vec![json!({"content": "no title"})]).is_err());
    }

    #[test]
    fn test_about_splits_paragraphs_and_reads_metadata() {
        let about = About::decode(vec![json!({
            "section": "about",
            "title": "Our Story",
            "content": "First.\n\nSecond.\n\n\n",
            "metadata": {
                "features": [{"title": "Fresh Daily", "description": "Baked every morning."}],
                "mission": "Joy."
            }
        })])
        .unwrap()
        .unwrap();

        assert_eq!(about.paragraphs, ["First.", "Second."]);
        assert_eq!(about.features.len(), 1);
        assert_eq!(about.mission.as_deref(), Some("Joy."));
    }

    #[test]
    fn test_about_fallback_copy() {
        let about = About::fallback();
        assert_eq!(about.paragraphs.len(), 3);
        let titles: Vec<_> = about.features.iter().map(|f| f.title.as_str()).collect();
        assert_eq!(
            titles,
            ["Made with Love", "Premium Quality", "Family Tradition", "Fresh Daily"]
        );
    }

    #[test]
    fn test_store_info_decodes_hours() {
        let info = StoreInfo::decode(vec![json!({
            "address": "1 Cocoa Lane",
            "phone": "555-0100",
            "email": "shop@example.com",
            "hours": [{"day": "Daily", "time": "9:00 AM - 5:00 PM"}]
        })])
        .unwrap()
        .unwrap();

        assert_eq!(info.hours[0].day, "Daily");
        assert!(info.render().lines.contains(&"Daily: 9:00 AM - 5:00 PM".to_string()));
    }

    #[test]
    fn test_social_links_keep_order_and_handle() {
        let links = SocialLinks::decode(vec![
            json!({"platform": "Instagram", "url": "https://instagram.com/sd", "sort_order": 1, "handle": "@sd"}),
            json!({"platform": "Facebook", "url": "https://facebook.com/sd", "sort_order": 2}),
        ])
        .unwrap()
        .unwrap();

        assert_eq!(links.handle, "@sd");
        assert_eq!(links.links[0].platform, "Instagram");
    }

    #[test]
    fn test_social_links_empty_is_none() {
        assert_eq!(SocialLinks::decode(Vec::new()).unwrap(), None);
    }

    #[test]
    fn test_social_fallback_handle() {
        let links = SocialLinks::fallback();
        assert_eq!(links.handle, "@sweetdreamsbakery");
        assert_eq!(links.links.len(), 4);
    }
}
