use ntex::web;

/// Configures the Wompi webhook routes.
///
/// These routes are public endpoints, authenticity comes from the request
/// signature instead of a user session.
///
/// # Routes
/// - `POST /webhook/wompi` - Wompi event receiver
pub fn wompi(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/webhook/wompi").service((super::wompi::receive,)));
}
