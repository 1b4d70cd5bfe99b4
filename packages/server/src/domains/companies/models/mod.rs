pub mod company;
pub mod scrape_job;

pub use company::*;
pub use scrape_job::*;
