pub mod crawler;
pub mod session;
pub mod web;

pub use crawler::Renderer;
pub use session::CrawlSession;
pub use web::WebDriverRenderer;
