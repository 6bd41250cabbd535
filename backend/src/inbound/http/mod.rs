//! HTTP inbound adapter exposing the REST endpoints.

pub mod admin;
pub mod auth;
pub mod chats;
pub mod error;
pub mod health;
pub mod matches;
pub mod matching;
pub mod reports;
pub mod restaurants;
pub mod state;
pub mod users;

use actix_web::web;

pub use error::ApiResult;

/// Register every API route plus the extractor error handlers.
///
/// Health probes are mounted separately by the server because they do not
/// depend on [`state::HttpState`].
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(error::json_config())
        .app_data(error::query_config())
        .app_data(error::path_config())
        .service(users::register)
        .service(users::get_user)
        .service(users::update_user)
        .service(users::change_password)
        .service(users::delete_user)
        .service(users::login)
        .service(users::current_user)
        .service(matches::list_matches)
        .service(matches::get_match)
        .service(matches::create_match)
        .service(matches::update_match)
        .service(matches::set_check_in)
        .service(matches::get_check_in)
        .service(matches::list_check_ins)
        .service(matches::add_review)
        .service(matches::list_reviews)
        // `mine` must be registered before the `{id}` route it would match.
        .service(matching::my_recruitments)
        .service(matching::create_recruitment)
        .service(matching::list_recruitments)
        .service(matching::get_recruitment)
        .service(matching::change_recruitment_status)
        .service(matching::send_request)
        .service(matching::sent_requests)
        .service(matching::received_requests)
        .service(matching::respond_to_request)
        .service(matching::cancel_request)
        .service(chats::create_chat)
        .service(chats::list_chats)
        .service(chats::get_chat)
        .service(chats::list_messages)
        .service(chats::post_message)
        .service(reports::file_report)
        .service(restaurants::list_restaurants)
        .service(restaurants::get_restaurant)
        .service(restaurants::create_restaurant)
        .service(restaurants::update_restaurant)
        .service(restaurants::delete_restaurant)
        .service(admin::stats)
        .service(admin::list_users)
        .service(admin::set_suspension)
        .service(admin::set_role)
        .service(admin::list_reports)
        .service(admin::resolve_report);
}
