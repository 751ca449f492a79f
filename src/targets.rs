/// Root of the demo shop's client-side-paginated listing tree.
pub const BASE_URL: &str = "https://webscraper.io/test-sites/e-commerce/more/";

/// One named site section, scraped to `<name>.csv`.
#[derive(Debug, Clone)]
pub struct ScrapeTarget {
    pub name: &'static str,
    pub url: String,
}

impl ScrapeTarget {
    fn new(name: &'static str, path: &str) -> Self {
        Self {
            name,
            url: format!("{}{}", BASE_URL, path),
        }
    }
}

/// The six demo shop sections. The sweep visits them in this order; laptops
/// and tablets sit under computers, touch under phones, but each is scraped
/// as an independent top-level target.
pub fn default_targets() -> Vec<ScrapeTarget> {
    vec![
        ScrapeTarget::new("home", ""),
        ScrapeTarget::new("computers", "computers"),
        ScrapeTarget::new("laptops", "computers/laptops"),
        ScrapeTarget::new("tablets", "computers/tablets"),
        ScrapeTarget::new("phones", "phones"),
        ScrapeTarget::new("touch", "phones/touch"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_categories_in_declaration_order() {
        let names: Vec<&str> = default_targets().iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            ["home", "computers", "laptops", "tablets", "phones", "touch"]
        );
    }

    #[test]
    fn urls_are_rooted_at_the_demo_site() {
        for target in default_targets() {
            assert!(
                target.url.starts_with(BASE_URL),
                "{} is not under the demo site root",
                target.url
            );
        }
    }

    #[test]
    fn nested_categories_sit_under_their_parents() {
        let targets = default_targets();
        assert!(targets[2].url.ends_with("computers/laptops"));
        assert!(targets[3].url.ends_with("computers/tablets"));
        assert!(targets[5].url.ends_with("phones/touch"));
    }
}
