use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Responder};
use tracing::debug;
use tracing::instrument;

use crate::config::Config;
use crate::errors::BatchlinkError;
use crate::services::clicks::ClickAccountant;

pub struct RedirectService {}

impl RedirectService {
    #[instrument(skip(accountant, config), fields(path = %path))]
    pub async fn handle_redirect(
        path: web::Path<String>,
        accountant: web::Data<ClickAccountant>,
        config: web::Data<Config>,
    ) -> impl Responder {
        let captured_path = path.into_inner();

        if captured_path.is_empty() {
            return HttpResponse::TemporaryRedirect()
                .insert_header(("Location", config.default_url.as_str()))
                .finish();
        }

        match accountant
            .record_click(&captured_path, chrono::Utc::now())
            .await
        {
            Ok(url) => HttpResponse::build(StatusCode::TEMPORARY_REDIRECT)
                .insert_header(("Location", url.target))
                .finish(),
            Err(e @ BatchlinkError::Expired(_)) => {
                debug!("Redirect: '{}' expired", captured_path);
                HttpResponse::build(e.http_status())
                    .insert_header(("Content-Type", "text/html; charset=utf-8"))
                    .body("Link Expired")
            }
            Err(e) => {
                debug!("Redirect: '{}' not found", captured_path);
                HttpResponse::build(e.http_status())
                    .insert_header(("Content-Type", "text/html; charset=utf-8"))
                    .insert_header(("Cache-Control", "public, max-age=60"))
                    .body("Not Found")
            }
        }
    }
}
