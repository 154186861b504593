use serde::Serialize;

use super::{
    BeforeAfterSection, ContactSection, Footer, Hero, Navigation, ProductSection, ResultsSection,
    ReviewsSection, ServicesSection, TeamSection, WelcomeSection,
};

/// Everything the home page renders; a section that failed to load is `None`
#[derive(Debug, Clone, Default, Serialize)]
pub struct HomeContent {
    pub navigation: Option<Navigation>,
    pub hero: Option<Hero>,
    pub welcome: Option<WelcomeSection>,
    pub services: Option<ServicesSection>,
    pub team: Option<TeamSection>,
    pub results: Option<ResultsSection>,
    pub before_after: Option<BeforeAfterSection>,
    pub products: Option<ProductSection>,
    pub reviews: Option<ReviewsSection>,
    pub contact: Option<ContactSection>,
    pub footer: Option<Footer>,
}
