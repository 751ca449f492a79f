use anyhow::{Context, Result};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::ScrapeError;
use crate::models::Product;

const CARD_SELECTOR: &str = ".thumbnail";

/// Parses fully expanded listing markup into products, in document order.
/// Zero cards is a valid outcome (an empty category); a malformed card is
/// not: extraction fails for the whole page so a partial CSV is never
/// written.
pub fn extract_products(html: &str) -> Result<Vec<Product>> {
    let document = Html::parse_document(html);
    let card_selector = Selector::parse(CARD_SELECTOR).unwrap();

    let mut products = Vec::new();
    for (index, card) in document.select(&card_selector).enumerate() {
        let product = parse_product_card(card)
            .with_context(|| format!("Malformed product card at position {}", index))?;
        products.push(product);
    }
    Ok(products)
}

fn parse_product_card(card: ElementRef) -> Result<Product> {
    let title_selector = Selector::parse(".title").unwrap();
    let description_selector = Selector::parse(".description").unwrap();
    let price_selector = Selector::parse(".price").unwrap();
    let star_selector = Selector::parse("span.ws-icon-star").unwrap();
    let review_selector = Selector::parse(".review-count").unwrap();

    // The visible anchor text gets ellipsized on narrow cards; the `title`
    // attribute carries the full name.
    let title = card
        .select(&title_selector)
        .next()
        .ok_or(ScrapeError::MissingElement(".title"))?
        .value()
        .attr("title")
        .ok_or(ScrapeError::MissingAttribute {
            element: ".title",
            attribute: "title",
        })?
        .to_string();

    let description = card
        .select(&description_selector)
        .next()
        .ok_or(ScrapeError::MissingElement(".description"))?
        .text()
        .collect::<String>()
        .replace('\u{a0}', " ");

    let price_text = card
        .select(&price_selector)
        .next()
        .ok_or(ScrapeError::MissingElement(".price"))?
        .text()
        .collect::<String>();
    let price = parse_price(&price_text)?;

    // The rating has no numeric field in the markup; it is however many star
    // icons the card renders.
    let rating = card.select(&star_selector).count() as u32;

    let review_text = card
        .select(&review_selector)
        .next()
        .ok_or(ScrapeError::MissingElement(".review-count"))?
        .text()
        .collect::<String>();
    let num_of_reviews = parse_review_count(&review_text)?;

    Ok(Product {
        title,
        description,
        price,
        rating,
        num_of_reviews,
    })
}

/// Pulls the numeric token out of a currency-formatted string like
/// "$1769.00".
fn parse_price(text: &str) -> Result<f64, ScrapeError> {
    let re = Regex::new(r"[0-9]+(?:[.,][0-9]+)*").unwrap();
    let token = re.find(text).ok_or_else(|| ScrapeError::BadNumber {
        field: "price",
        text: text.trim().to_string(),
    })?;
    token
        .as_str()
        .replace(',', "")
        .parse::<f64>()
        .map_err(|_| ScrapeError::BadNumber {
            field: "price",
            text: text.trim().to_string(),
        })
}

/// Review counts render as "14 reviews"; only the leading token is the count.
fn parse_review_count(text: &str) -> Result<u32, ScrapeError> {
    let token = text
        .split_whitespace()
        .next()
        .ok_or_else(|| ScrapeError::BadNumber {
            field: "num_of_reviews",
            text: text.to_string(),
        })?;
    token.parse::<u32>().map_err(|_| ScrapeError::BadNumber {
        field: "num_of_reviews",
        text: token.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_card(
        title: &str,
        description: &str,
        price: &str,
        stars: usize,
        review_text: &str,
    ) -> String {
        let star_spans = "<span class=\"ws-icon ws-icon-star\"></span>".repeat(stars);
        format!(
            r#"<div class="card thumbnail">
                <img class="img-fluid card-img-top" src="/images/test-sites/e-commerce/items/cart2.png">
                <div class="caption card-body">
                    <h4 class="price float-end card-title pull-right">{price}</h4>
                    <h4><a href="/test-sites/e-commerce/more/product/31" class="title" title="{title}">{title}</a></h4>
                    <p class="description card-text">{description}</p>
                </div>
                <div class="ratings">
                    <p class="review-count float-end">{review_text}</p>
                    <p data-rating="{stars}">{star_spans}</p>
                </div>
            </div>"#
        )
    }

    fn listing_page(cards: &[String]) -> String {
        format!(
            "<html><body><div class=\"wrapper\"><div class=\"row ecomerce-items\">{}</div></div></body></html>",
            cards.join("\n")
        )
    }

    #[test]
    fn parses_a_well_formed_card() {
        let page = listing_page(&[product_card(
            "Asus X",
            "Asus X&nbsp;description",
            "$599.99",
            3,
            "4 reviews",
        )]);

        let products = extract_products(&page).unwrap();
        assert_eq!(
            products,
            vec![Product {
                title: "Asus X".to_string(),
                description: "Asus X description".to_string(),
                price: 599.99,
                rating: 3,
                num_of_reviews: 4,
            }]
        );
    }

    #[test]
    fn title_comes_from_the_attribute_not_the_anchor_text() {
        let card = product_card("HP 250 G6", "Plain laptop", "$520.99", 2, "7 reviews")
            .replace(">HP 250 G6</a>", ">HP 250...</a>");
        let products = extract_products(&listing_page(&[card])).unwrap();
        assert_eq!(products[0].title, "HP 250 G6");
    }

    #[test]
    fn whole_dollar_prices_parse() {
        let page = listing_page(&[product_card(
            "Asus ROG",
            "Gaming laptop",
            "$1769.00",
            5,
            "12 reviews",
        )]);
        assert_eq!(extract_products(&page).unwrap()[0].price, 1769.0);
    }

    #[test]
    fn rating_counts_only_star_icons() {
        let card = r#"<div class="thumbnail">
            <h4 class="price">$99.99</h4>
            <h4><a class="title" title="Memo Pad">Memo Pad</a></h4>
            <p class="description">7 inch tablet</p>
            <p class="review-count">2 reviews</p>
            <span class="ws-icon ws-icon-star"></span>
            <span class="ws-icon ws-icon-star"></span>
            <span class="ws-icon ws-icon-heart"></span>
        </div>"#;
        let products = extract_products(card).unwrap();
        assert_eq!(products[0].rating, 2);
    }

    #[test]
    fn cards_come_back_in_document_order() {
        let page = listing_page(&[
            product_card("First", "a", "$1.00", 1, "1 reviews"),
            product_card("Second", "b", "$2.00", 2, "2 reviews"),
        ]);
        let titles: Vec<String> = extract_products(&page)
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, ["First", "Second"]);
    }

    #[test]
    fn zero_cards_yield_an_empty_sequence() {
        let products = extract_products("<html><body><p>nothing for sale</p></body></html>").unwrap();
        assert!(products.is_empty());
    }

    #[test]
    fn missing_price_element_fails_the_card() {
        let card = product_card("Asus X", "desc", "$599.99", 3, "4 reviews")
            .replace(r#"<h4 class="price float-end card-title pull-right">$599.99</h4>"#, "");
        assert!(extract_products(&listing_page(&[card])).is_err());
    }

    #[test]
    fn missing_title_attribute_fails_the_card() {
        let card = product_card("Asus X", "desc", "$599.99", 3, "4 reviews")
            .replace(r#"class="title" title="Asus X""#, r#"class="title""#);
        assert!(extract_products(&listing_page(&[card])).is_err());
    }

    #[test]
    fn non_numeric_review_text_fails_the_card() {
        let page = listing_page(&[product_card(
            "Asus X",
            "desc",
            "$599.99",
            3,
            "no reviews yet",
        )]);
        assert!(extract_products(&page).is_err());
    }

    #[test]
    fn one_malformed_card_fails_the_whole_page() {
        let good = product_card("Good", "fine", "$10.00", 4, "3 reviews");
        let bad = product_card("Bad", "broken", "not a price", 1, "1 reviews");
        let err = extract_products(&listing_page(&[good, bad])).unwrap_err();
        assert!(format!("{:#}", err).contains("position 1"));
    }

    #[test]
    fn price_token_extraction() {
        assert_eq!(parse_price("$599.99").unwrap(), 599.99);
        assert_eq!(parse_price("$1,769.00").unwrap(), 1769.0);
        assert!(parse_price("price on request").is_err());
    }
}
