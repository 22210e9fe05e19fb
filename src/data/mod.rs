mod fixtures;

pub use fixtures::{fixture_articles, fixture_categories};
