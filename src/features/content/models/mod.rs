pub mod home;
pub mod layout;
pub mod page;
pub mod sections;
pub mod showcase;

pub use home::HomeContent;
pub use layout::{Footer, Hero, Navigation};
pub use page::Page;
pub use sections::{
    CarouselButtons, ContactCard, ContactSection, ResultsSection, ReviewsSection, ServicesSection,
};
pub use showcase::{BeforeAfterSection, ProductSection, TeamSection, WelcomeItem, WelcomeSection};
