//! 路径参数提取器
//!
//! 非法 UUID 直接返回统一格式的 400 响应，不会进入处理函数。

use actix_web::{
    Error, FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError,
};
use futures_util::future::{Ready, ready};
use uuid::Uuid;

use crate::models::{ApiResponse, ErrorCode};

fn parse_uuid_param(req: &HttpRequest, name: &str) -> Result<Uuid, Error> {
    let raw = req.match_info().get(name).unwrap_or_default();
    raw.parse::<Uuid>().map_err(|_| {
        let response = HttpResponse::BadRequest().json(ApiResponse::<()>::error_empty(
            ErrorCode::BadRequest,
            format!("Invalid path parameter '{name}': expected a UUID, got '{raw}'"),
        ));
        InternalError::from_response(format!("invalid uuid: {raw}"), response).into()
    })
}

macro_rules! define_safe_uuid_extractor {
    ($(#[$meta:meta])* $name:ident, $param:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(pub Uuid);

        impl FromRequest for $name {
            type Error = Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
                ready(parse_uuid_param(req, $param).map($name))
            }
        }
    };
}

define_safe_uuid_extractor!(
    /// 路径中的 `{id}`
    SafeId,
    "id"
);
define_safe_uuid_extractor!(
    /// 路径中的 `{criterion_id}`
    SafeCriterionId,
    "criterion_id"
);
define_safe_uuid_extractor!(
    /// 路径中的 `{result_id}`
    SafeResultId,
    "result_id"
);

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test, web};

    async fn echo(path: SafeId) -> HttpResponse {
        HttpResponse::Ok().body(path.0.to_string())
    }

    #[actix_web::test]
    async fn test_valid_uuid_is_extracted() {
        let app = test::init_service(App::new().route("/items/{id}", web::get().to(echo))).await;
        let id = Uuid::new_v4();
        let req = test::TestRequest::get()
            .uri(&format!("/items/{id}"))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, id.to_string());
    }

    #[actix_web::test]
    async fn test_invalid_uuid_is_bad_request() {
        let app = test::init_service(App::new().route("/items/{id}", web::get().to(echo))).await;
        let req = test::TestRequest::get().uri("/items/42").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], ErrorCode::BadRequest as i32);
    }
}
