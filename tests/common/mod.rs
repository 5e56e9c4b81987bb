//! Shared fixtures for integration tests

#![allow(dead_code)]

use catalog_harvest::config::{
    Config, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig,
};
use std::path::Path;

/// Creates a test configuration for a site rooted at `base_url`
pub fn create_test_config(base_url: &str, out_dir: &Path) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_concurrent_requests: 2,
            request_timeout_secs: 5,
            max_retries: 2,
            retry_delay_ms: 10, // Very short for testing
            ..CrawlerConfig::default()
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        site: SiteConfig {
            start_url: format!("{}/hoodies-c-181.html", base_url),
            catalog_page_template: format!("{}/hoodies-c-181-page-{{page}}.html", base_url),
            review_index_template: format!("{}/review-{{product_id}}.htm", base_url),
            review_page_template: format!("{}/review-{{product_id}}-page-{{page}}.html", base_url),
            products_per_page: 2,
            reviews_per_page: 6,
        },
        render: None,
        output: OutputConfig {
            products_path: out_dir.join("products.csv").display().to_string(),
            reviews_path: out_dir.join("reviews.csv").display().to_string(),
            delimiter: ",".to_string(),
            database_path: None,
        },
    }
}

pub fn seed_page(total: u32) -> String {
    format!(
        r#"<html><body><div class="cat-name"><h1>Hoodies</h1><span>{} Products</span></div></body></html>"#,
        total
    )
}

/// A catalog page listing `(href, regular price)` entries
pub fn catalog_page(entries: &[(&str, Option<&str>)]) -> String {
    let goods: String = entries
        .iter()
        .map(|(href, price)| {
            let price = price
                .map(|p| {
                    format!(
                        r#"<span class="my-shop-price category-good-price-market dl-has-rrp-tag" data-orgp="{}"></span>"#,
                        p
                    )
                })
                .unwrap_or_default();
            format!(
                r#"<div class="category-good js-good"><p class="category-good-name"><a href="{}">Item</a></p>{}</div>"#,
                href, price
            )
        })
        .collect();

    format!(
        r#"<html><body><div class="category-list js-category">{}</div></body></html>"#,
        goods
    )
}

pub fn product_page(id: &str, name: &str, price: &str, market_price: Option<&str>, rating: &str) -> String {
    let market = market_price
        .map(|m| format!(r#"o.goods.market_price = "{}","#, m))
        .unwrap_or_default();
    format!(
        r#"<html><body>
        <input type="hidden" id="hidden-goodsId" value="{id}">
        <div class="goodtitle-wrap"><span class="goodtitle">{name}</span></div>
        <strong id="js_reviewCountText">{rating}</strong>
        <div class="xxkkk20"><strong>Shirt Length:</strong> Regular</div>
        <div class="xxkkk20"><strong>Sleeve Length:</strong> Full</div>
        <script>o.goods.price = "{price}", {market}</script>
        </body></html>"#
    )
}

pub fn review_index(total: u32) -> String {
    format!(r#"<html><body><p class="reviewnum">{} Reviews</p></body></html>"#, total)
}

/// A review page with one block per `(stars, text)` entry
pub fn review_page(reviews: &[(usize, &str)]) -> String {
    let blocks: String = reviews
        .iter()
        .map(|(stars, text)| {
            format!(
                r#"<div class="reviewinfo">
                    <p class="star">{}</p>
                    <span class="reviewtime">Nov,12 2019 03:21:45</span>
                    <p class="reviewcon">{}</p>
                    <p class="color-size"><span>Color: Black</span><span>Size: XL</span></p>
                </div>"#,
                r#"<i class="icon-star-black"></i>"#.repeat(*stars),
                text
            )
        })
        .collect();

    format!(
        r#"<html><body><div class="reviewwrap">{}</div></body></html>"#,
        blocks
    )
}
