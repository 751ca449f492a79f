use std::time::Duration;

use anyhow::{Context, Result};
use headless_chrome::{Browser, Element, LaunchOptions};

use crate::debug_println;
use crate::error::ScrapeError;

/// Class of the "load more" control on the demo shop's listing pages.
const MORE_BUTTON_SELECTOR: &str = ".btn";

/// How long to wait for the optional "load more" control before deciding the
/// page has no client-side pagination.
const MORE_BUTTON_WAIT: Duration = Duration::from_secs(5);

/// Seam between the pipeline and the browser, so the pipeline can be tested
/// with canned markup.
pub trait PageFetcher {
    /// Returns the page markup with client-side pagination fully expanded.
    fn fetch_expanded_html(&self, url: &str) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Upper bound on "load more" clicks before giving up on a page.
    pub max_clicks: usize,
    /// Pause between a click and the next visibility probe.
    pub click_delay: Duration,
    /// Run Chrome without a window.
    pub headless: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            max_clicks: 200,
            click_delay: Duration::from_millis(250),
            headless: true,
        }
    }
}

/// Drives one fresh Chrome session per page. The `Browser` is dropped at the
/// end of each call, which kills its Chrome process, so sessions cannot leak
/// across categories.
pub struct BrowserFetcher {
    options: FetchOptions,
}

impl BrowserFetcher {
    pub fn new(options: FetchOptions) -> Self {
        Self { options }
    }

    fn launch(&self) -> Result<Browser> {
        let launch_options = LaunchOptions::default_builder()
            .headless(self.options.headless)
            .sandbox(false)
            .idle_browser_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to assemble Chrome launch options: {:?}", e))?;
        Browser::new(launch_options).context("Failed to launch Chrome")
    }

    fn exhaust_pagination(&self, url: &str, button: &Element) -> Result<()> {
        let clicks = click_until_hidden(
            url,
            self.options.max_clicks,
            self.options.click_delay,
            || Ok(pagination_exhausted(&inline_style(button)?)),
            || {
                button
                    .call_js_fn("function() { this.click(); }", vec![], false)
                    .context("Failed to dispatch click on \"load more\" control")?;
                Ok(())
            },
        )?;
        debug_println!("Pagination exhausted after {} clicks", clicks);
        Ok(())
    }
}

impl PageFetcher for BrowserFetcher {
    fn fetch_expanded_html(&self, url: &str) -> Result<String> {
        let browser = self.launch()?;
        let tab = browser.new_tab().context("Failed to open browser tab")?;

        tab.navigate_to(url)
            .with_context(|| format!("Failed to navigate to {}", url))?;
        tab.wait_until_navigated()
            .with_context(|| format!("Page did not finish loading: {}", url))?;

        // The control is optional: a category short enough to fit one page
        // never renders it. A lookup miss is "no pagination", not an error.
        match tab.wait_for_element_with_custom_timeout(MORE_BUTTON_SELECTOR, MORE_BUTTON_WAIT) {
            Ok(button) => self.exhaust_pagination(url, &button)?,
            Err(_) => debug_println!("No \"load more\" control on {}", url),
        }

        tab.get_content()
            .with_context(|| format!("Failed to capture page markup for {}", url))
    }
}

/// Probe-then-click loop shared by the browser fetcher and its tests: clicks
/// while `exhausted` stays false, at most `max_clicks` times with `delay`
/// between rounds. Returns the number of clicks issued, or a pagination
/// timeout if the control never reached its terminal state.
fn click_until_hidden(
    url: &str,
    max_clicks: usize,
    delay: Duration,
    mut exhausted: impl FnMut() -> Result<bool>,
    mut click: impl FnMut() -> Result<()>,
) -> Result<usize> {
    let mut clicks = 0;
    loop {
        if exhausted()? {
            return Ok(clicks);
        }
        if clicks == max_clicks {
            return Err(ScrapeError::PaginationTimeout {
                url: url.to_string(),
                clicks,
            }
            .into());
        }
        click()?;
        clicks += 1;
        std::thread::sleep(delay);
    }
}

fn inline_style(button: &Element) -> Result<String> {
    let style = button
        .call_js_fn(
            "function() { return this.getAttribute(\"style\") || \"\"; }",
            vec![],
            false,
        )
        .context("Failed to read style attribute of \"load more\" control")?;
    Ok(match style.value {
        Some(serde_json::Value::String(s)) => s,
        _ => String::new(),
    })
}

/// The demo shop hides the exhausted control by giving it an inline `style`
/// attribute; the attribute's presence is the terminal state.
pub fn pagination_exhausted(style: &str) -> bool {
    !style.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn visible_control_is_not_exhausted() {
        assert!(!pagination_exhausted(""));
    }

    #[test]
    fn whitespace_only_style_is_not_exhausted() {
        assert!(!pagination_exhausted("   "));
    }

    #[test]
    fn hidden_control_is_exhausted() {
        assert!(pagination_exhausted("display: none;"));
    }

    #[test]
    fn already_hidden_control_gets_no_clicks() {
        let clicked = Cell::new(0);
        let result = click_until_hidden(
            "http://stub",
            10,
            Duration::ZERO,
            || Ok(true),
            || {
                clicked.set(clicked.get() + 1);
                Ok(())
            },
        );
        assert_eq!(result.unwrap(), 0);
        assert_eq!(clicked.get(), 0);
    }

    #[test]
    fn control_hiding_after_three_clicks_gets_exactly_three() {
        let clicked = Cell::new(0);
        let result = click_until_hidden(
            "http://stub",
            10,
            Duration::ZERO,
            || Ok(clicked.get() >= 3),
            || {
                clicked.set(clicked.get() + 1);
                Ok(())
            },
        );
        assert_eq!(result.unwrap(), 3);
        assert_eq!(clicked.get(), 3);
    }

    #[test]
    fn a_control_that_never_hides_times_out_at_the_cap() {
        let clicked = Cell::new(0);
        let err = click_until_hidden(
            "http://stub",
            5,
            Duration::ZERO,
            || Ok(false),
            || {
                clicked.set(clicked.get() + 1);
                Ok(())
            },
        )
        .unwrap_err();

        assert_eq!(clicked.get(), 5);
        match err.downcast_ref::<ScrapeError>() {
            Some(ScrapeError::PaginationTimeout { clicks, .. }) => assert_eq!(*clicks, 5),
            other => panic!("expected PaginationTimeout, got {:?}", other),
        }
    }

    #[test]
    fn default_options_are_bounded() {
        let options = FetchOptions::default();
        assert!(options.max_clicks > 0);
        assert!(options.headless);
    }
}
