//! Fixed page routes
//!
//! The homepage view render plus the two plain-text pages. Bodies are
//! hard-coded, there is no data model behind them.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::config::AppState;
use crate::http;
use crate::logger;

/// Greeting interpolated into the homepage view
pub const GREETING: &str = "Hey everyone! This is my webpage!";

const ABOUT_BODY: &str = "Welcome to my about page!";
const WEATHER_BODY: &str = "The current weather is NICE.";

/// `GET /` - render the index view with the greeting
pub fn index(state: &AppState, is_head: bool) -> Response<Full<Bytes>> {
    let template = match state.templates.get_template(&state.config.site.index_view) {
        Ok(t) => t,
        Err(e) => {
            logger::log_error(&format!(
                "View '{}' not found: {e}",
                state.config.site.index_view
            ));
            return http::build_500_response();
        }
    };

    match template.render(minijinja::context! { message => GREETING }) {
        Ok(html) => http::build_html_response(html, is_head),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to render view '{}': {e}",
                state.config.site.index_view
            ));
            http::build_500_response()
        }
    }
}

/// `GET /about`
pub fn about(is_head: bool) -> Response<Full<Bytes>> {
    http::build_text_response(ABOUT_BODY, is_head)
}

/// `GET /weather`
pub fn weather(is_head: bool) -> Response<Full<Bytes>> {
    http::build_text_response(WEATHER_BODY, is_head)
}
