use std::future::Future;
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::content::models::{
    BeforeAfterSection, CarouselButtons, ContactCard, ContactSection, Footer, Hero, HomeContent,
    Navigation, Page, ProductSection, ResultsSection, ReviewsSection, ServicesSection,
    TeamSection, WelcomeItem, WelcomeSection,
};
use crate::modules::cms::{
    normalize_with_fallback, CmsClient, CmsQuery, Media, NormalizeMedia, Populate, Relation,
};

/// Service fetching and normalizing the content of each site section
pub struct ContentService {
    cms: Arc<CmsClient>,
    default_image: String,
}

impl ContentService {
    pub fn new(cms: Arc<CmsClient>, default_image: String) -> Self {
        Self { cms, default_image }
    }

    fn base_url(&self) -> &str {
        self.cms.base_url()
    }

    pub async fn navigation(&self) -> Result<Navigation> {
        let mut navigation: Navigation = self
            .cms
            .fetch_data("/navigation", &navigation_query(), "navigation")
            .await?;

        navigation.items.sort_by_key(|item| item.order);
        navigation.normalize_media(self.base_url());
        Ok(navigation)
    }

    pub async fn hero(&self) -> Result<Hero> {
        let mut hero: Hero = self
            .cms
            .fetch_data("/home-page", &hero_query(), "home page")
            .await?;

        hero.normalize_media(self.base_url());

        // Always render a banner image
        let current = hero.background_image.take().unwrap_or_default();
        let url = normalize_with_fallback(
            self.base_url(),
            Some(current.url.as_str()),
            Some(self.default_image.as_str()),
        );
        hero.background_image = Some(Media { url, ..current });

        Ok(hero)
    }

    pub async fn services_section(&self) -> Result<ServicesSection> {
        let mut section: ServicesSection = self
            .cms
            .fetch_data("/services-section", &services_query(), "services section")
            .await?;

        section.normalize_media(self.base_url());
        Ok(section)
    }

    pub async fn reviews_section(&self) -> Result<ReviewsSection> {
        let mut section: ReviewsSection = self
            .cms
            .fetch_data("/reviews-section", &reviews_query(), "reviews section")
            .await?;

        section.sort_reviews();
        section.normalize_media(self.base_url());
        Ok(section)
    }

    pub async fn results_section(&self) -> Result<ResultsSection> {
        let mut section: ResultsSection = self
            .cms
            .fetch_data("/results-section", &results_query(), "results section")
            .await?;

        section.normalize_media(self.base_url());
        Ok(section)
    }

    pub async fn contact_section(&self) -> Result<ContactSection> {
        let (mut section, cards): (ContactSection, Vec<ContactCard>) = self
            .cms
            .fetch_section_with_items("/contact-section", "/contact-cards", "icon", "contact")
            .await?;

        section.cards = cards;
        section.normalize_media(self.base_url());
        Ok(section)
    }

    pub async fn team_members(&self) -> Result<TeamSection> {
        let mut section: TeamSection = self
            .cms
            .fetch_data("/team-member", &team_query(), "team members")
            .await?;

        section.sort_members();
        section.normalize_media(self.base_url());
        Ok(section)
    }

    pub async fn products_section(&self) -> Result<ProductSection> {
        let mut section: ProductSection = self
            .cms
            .fetch_data("/product", &products_query(), "products")
            .await?;

        section.normalize_media(self.base_url());
        Ok(section)
    }

    pub async fn welcome_section(&self) -> Result<WelcomeSection> {
        let (mut section, items): (WelcomeSection, Vec<WelcomeItem>) = self
            .cms
            .fetch_section_with_items("/welcome-section", "/welcome-items", "icon", "welcome")
            .await?;

        section.items = items;
        section.normalize_media(self.base_url());
        Ok(section)
    }

    pub async fn before_after_section(&self) -> Result<BeforeAfterSection> {
        let mut section: BeforeAfterSection = self
            .cms
            .fetch_data("/before-after-section", &before_after_query(), "before/after section")
            .await?;

        section.apply_defaults();
        section.normalize_media(self.base_url());
        Ok(section)
    }

    pub async fn footer(&self) -> Result<Footer> {
        let footer: Footer = self
            .cms
            .fetch_data("/footer", &footer_query(), "footer")
            .await?;
        Ok(footer)
    }

    /// Generic page by slug; `None` when the CMS has no such page
    pub async fn page_by_slug(&self, slug: &str) -> Result<Option<Page>> {
        let page: Option<Page> = self.cms.find_page_by_slug(slug).await?;

        Ok(page.map(|mut page| {
            page.normalize_media(self.base_url());
            page
        }))
    }

    /// Fetch every home page section concurrently
    pub async fn home(&self) -> HomeContent {
        let (navigation, hero, welcome, services, team, results) = tokio::join!(
            optional("navigation", self.navigation()),
            optional("hero", self.hero()),
            optional("welcome", self.welcome_section()),
            optional("services", self.services_section()),
            optional("team", self.team_members()),
            optional("results", self.results_section()),
        );
        let (before_after, products, reviews, contact, footer) = tokio::join!(
            optional("before/after", self.before_after_section()),
            optional("products", self.products_section()),
            optional("reviews", self.reviews_section()),
            optional("contact", self.contact_section()),
            optional("footer", self.footer()),
        );

        HomeContent {
            navigation,
            hero,
            welcome,
            services,
            team,
            results,
            before_after,
            products,
            reviews,
            contact,
            footer,
        }
    }

    /// Header and footer for pages other than home
    pub async fn chrome(&self) -> (Option<Navigation>, Option<Footer>) {
        tokio::join!(
            optional("navigation", self.navigation()),
            optional("footer", self.footer()),
        )
    }
}

/// Log a section failure and let the page render without it
async fn optional<T>(section: &str, fut: impl Future<Output = Result<T>>) -> Option<T> {
    match fut.await {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Skipping {} section: {}", section, e);
            None
        }
    }
}

// =============================================================================
// QUERIES
// =============================================================================

fn navigation_query() -> CmsQuery {
    CmsQuery::new().populate("*")
}

fn hero_query() -> CmsQuery {
    CmsQuery::new().populate("backgroundImage")
}

fn services_query() -> CmsQuery {
    CmsQuery::new().populate(Populate::relations([
        (
            "services",
            Relation::populate(Populate::relations([(
                "ServiceSection",
                Relation::populate("ServiceItem"),
            )])),
        ),
        (
            "carouselButtons",
            Relation::populate(CarouselButtons::ICON_FIELDS),
        ),
    ]))
}

fn reviews_query() -> CmsQuery {
    CmsQuery::new().populate(Populate::relations([
        ("reviews", Relation::populate("customerAvatar")),
        (
            "carouselButtons",
            Relation::populate(CarouselButtons::ICON_FIELDS),
        ),
        ("button", Relation::populate("icon")),
    ]))
}

fn results_query() -> CmsQuery {
    CmsQuery::new().populate("ResultCard.CardImage")
}

fn team_query() -> CmsQuery {
    CmsQuery::new().populate(Populate::relations([
        ("TeamMember", Relation::populate(["TeamMemberImage"])),
        ("CalendarIcon", Relation::All),
        ("ScheduleIcon", Relation::All),
        (
            "carouselButtons",
            Relation::populate(CarouselButtons::ICON_FIELDS),
        ),
    ]))
}

fn products_query() -> CmsQuery {
    CmsQuery::new().populate("*")
}

fn before_after_query() -> CmsQuery {
    CmsQuery::new().populate(Populate::relations([
        ("beforeAfterItems", Relation::populate("beforeAfterImage")),
        (
            "carouselButtons",
            Relation::populate(CarouselButtons::ICON_FIELDS),
        ),
    ]))
}

fn footer_query() -> CmsQuery {
    CmsQuery::new().populate(Populate::relations([
        ("scheduleBlock", Relation::populate("schedule")),
        ("formBlock", Relation::All),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{spawn_fake_cms, test_cms_config};
    use axum::{http::StatusCode, routing::get, Json, Router};
    use serde_json::json;

    fn pairs(query: CmsQuery) -> Vec<(String, String)> {
        query.to_pairs()
    }

    fn pair(key: &str, value: &str) -> (String, String) {
        (key.to_string(), value.to_string())
    }

    #[test]
    fn test_services_query_pairs() {
        assert_eq!(
            pairs(services_query()),
            vec![
                pair(
                    "populate[services][populate][ServiceSection][populate]",
                    "ServiceItem"
                ),
                pair("populate[carouselButtons][populate][0]", "prevActiveIcon"),
                pair("populate[carouselButtons][populate][1]", "prevInactiveIcon"),
                pair("populate[carouselButtons][populate][2]", "nextActiveIcon"),
                pair("populate[carouselButtons][populate][3]", "nextInactiveIcon"),
            ]
        );
    }

    #[test]
    fn test_reviews_and_footer_query_pairs() {
        let reviews = pairs(reviews_query());
        assert_eq!(reviews[0], pair("populate[reviews][populate]", "customerAvatar"));
        assert_eq!(reviews[5], pair("populate[button][populate]", "icon"));

        assert_eq!(
            pairs(footer_query()),
            vec![
                pair("populate[scheduleBlock][populate]", "schedule"),
                pair("populate[formBlock]", "true"),
            ]
        );
    }

    #[test]
    fn test_team_query_pairs() {
        assert_eq!(
            pairs(team_query())[..3],
            [
                pair("populate[TeamMember][populate][0]", "TeamMemberImage"),
                pair("populate[CalendarIcon]", "true"),
                pair("populate[ScheduleIcon]", "true"),
            ]
        );
        assert_eq!(pairs(team_query()).len(), 7);
    }

    #[test]
    fn test_before_after_query_pairs() {
        let pairs = pairs(before_after_query());
        assert_eq!(
            pairs[0],
            pair("populate[beforeAfterItems][populate]", "beforeAfterImage")
        );
        assert_eq!(
            pairs[1],
            pair("populate[carouselButtons][populate][0]", "prevActiveIcon")
        );
    }

    #[test]
    fn test_single_populate_queries() {
        assert_eq!(pairs(products_query()), vec![pair("populate", "*")]);
        assert_eq!(pairs(navigation_query()), vec![pair("populate", "*")]);
        assert_eq!(pairs(hero_query()), vec![pair("populate", "backgroundImage")]);
        assert_eq!(
            pairs(results_query()),
            vec![pair("populate", "ResultCard.CardImage")]
        );
    }

    fn fake_cms() -> Router {
        Router::new()
            .route(
                "/api/home-page",
                get(|| async {
                    Json(json!({ "data": { "title": "Bei Capelli", "buttonText": "Boek nu" } }))
                }),
            )
            .route(
                "/api/navigation",
                get(|| async {
                    Json(json!({ "data": {
                        "logoImage": { "url": "/uploads/logo.svg" },
                        "NavigationItems": [
                            { "label": "Contact", "URL": "#contact", "Order": 3 },
                            { "label": "Diensten", "URL": "#services", "Order": 1 }
                        ]
                    } }))
                }),
            )
            .route(
                "/api/contact-section",
                get(|| async { Json(json!({ "data": { "mapEmbedUrl": "https://maps.example" } })) }),
            )
            .route(
                "/api/contact-cards",
                get(|| async {
                    Json(json!({ "data": [
                        { "title": "Bel ons", "content": ["010 123 4567"], "icon": { "url": "/uploads/phone.svg" } }
                    ] }))
                }),
            )
            .route(
                "/api/team-member",
                get(|| async {
                    Json(json!({ "data": {
                        "Title": "Ons team",
                        "TeamMember": [
                            { "Name": "Lizzy", "Order": 2 },
                            {
                                "Name": "Sandra",
                                "Order": 1,
                                "TeamMemberImage": { "url": "/uploads/sandra.png" }
                            }
                        ]
                    } }))
                }),
            )
            .route(
                "/api/welcome-section",
                get(|| async {
                    Json(json!({ "data": { "title": "Welkom", "description": null } }))
                }),
            )
            .route(
                "/api/welcome-items",
                get(|| async {
                    Json(json!({ "data": [
                        { "title": "Persoonlijk advies", "description": "Altijd **eerlijk**" },
                        { "title": "Rustige salon", "icon": { "url": "/uploads/leaf.svg" } }
                    ] }))
                }),
            )
            .route(
                "/api/before-after-section",
                get(|| async {
                    Json(json!({ "data": { "Title": "", "beforeAfterItems": null } }))
                }),
            )
            .route(
                "/api/footer",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
            )
    }

    async fn service() -> ContentService {
        let base = spawn_fake_cms(fake_cms()).await;
        let cms = Arc::new(CmsClient::new(&test_cms_config(&base)).unwrap());
        ContentService::new(cms, "/placeholder.svg".to_string())
    }

    #[tokio::test]
    async fn test_hero_falls_back_to_default_image() {
        let service = service().await;
        let hero = service.hero().await.unwrap();
        assert_eq!(hero.title, "Bei Capelli");
        assert_eq!(hero.background_image.unwrap().url, "/placeholder.svg");
    }

    #[tokio::test]
    async fn test_navigation_sorted_and_normalized() {
        let service = service().await;
        let base = service.base_url().to_string();
        let navigation = service.navigation().await.unwrap();

        assert_eq!(navigation.items[0].label, "Diensten");
        assert_eq!(
            navigation.logo_image.unwrap().url,
            format!("{}/uploads/logo.svg", base)
        );
    }

    #[tokio::test]
    async fn test_contact_section_merges_cards() {
        let service = service().await;
        let base = service.base_url().to_string();
        let section = service.contact_section().await.unwrap();

        assert_eq!(section.cards.len(), 1);
        assert_eq!(
            section.cards[0].icon.as_ref().unwrap().url,
            format!("{}/uploads/phone.svg", base)
        );
    }

    #[tokio::test]
    async fn test_team_members_sorted_and_normalized() {
        let service = service().await;
        let base = service.base_url().to_string();
        let team = service.team_members().await.unwrap();

        assert_eq!(team.members[0].name, "Sandra");
        assert_eq!(
            team.members[0].image.as_ref().unwrap().url,
            format!("{}/uploads/sandra.png", base)
        );
        assert!(team.members[1].image.is_none());
    }

    #[tokio::test]
    async fn test_welcome_section_merges_items() {
        let service = service().await;
        let base = service.base_url().to_string();
        let welcome = service.welcome_section().await.unwrap();

        assert_eq!(welcome.title, "Welkom");
        assert_eq!(welcome.items.len(), 2);
        assert_eq!(
            welcome.items[0].description.to_html(),
            "<p>Altijd <strong>eerlijk</strong></p>"
        );
        assert_eq!(
            welcome.items[1].icon.as_ref().unwrap().url,
            format!("{}/uploads/leaf.svg", base)
        );
    }

    #[tokio::test]
    async fn test_before_after_section_gets_defaults() {
        let service = service().await;
        let section = service.before_after_section().await.unwrap();

        assert_eq!(section.title, "VOOR & NA");
        assert_eq!(section.filter_options.len(), 4);
        assert!(section.before_after_items.is_empty());
        assert!(!section.enable_zoom);
    }

    #[tokio::test]
    async fn test_home_omits_failing_sections() {
        let service = service().await;
        let home = service.home().await;

        assert!(home.hero.is_some());
        assert!(home.navigation.is_some());
        assert!(home.contact.is_some());
        assert!(home.team.is_some());
        assert!(home.welcome.is_some());
        assert!(home.before_after.is_some());
        // Unrouted or failing endpoints
        assert!(home.products.is_none());
        assert!(home.footer.is_none());
        assert!(home.services.is_none());
        assert!(home.reviews.is_none());
        assert!(home.results.is_none());
    }
}
