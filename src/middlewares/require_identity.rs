/*!
 * 身份认证中间件
 *
 * 凭证由外部用户目录服务签发，本服务只负责把 Bearer 凭证解析为调用方身份。
 *
 * ## 认证流程
 *
 * 1. 客户端在请求头中包含 `Authorization: Bearer <TOKEN>`
 * 2. 先查本地缓存（moka，TTL 见 `cache.identity_ttl`）
 * 3. 未命中时调用目录服务 `GET /me`，只接受 `is_active` 的用户，并写入缓存
 * 4. 把 [`Identity`] 与原始 [`Credential`] 存入请求扩展，后续处理程序通过
 *    [`RequireIdentity::extract_identity`] 等函数读取
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * web::scope("/api/v1/projects")
 *     .wrap(RequireIdentity)
 *     .route("", web::get().to(list_projects))
 * ```
 */

use crate::cache::{CacheResult, ObjectCache, get_json, insert_json};
use crate::clients::UserDirectory;
use crate::errors::PampError;
use crate::models::ErrorCode;
use crate::models::identity::entities::{Credential, Identity};
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error, info};
use uuid::Uuid;

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Clone)]
pub struct RequireIdentity;

fn cache_key(token: &str) -> String {
    format!("identity:{token}")
}

// 解析调用方身份
async fn resolve_identity(req: &ServiceRequest) -> Result<(Identity, Credential), PampError> {
    let header = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| PampError::authentication("No valid token provided"))?;
    let token = header
        .strip_prefix(BEARER_PREFIX)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| PampError::authentication("No valid token provided"))?;

    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|c| c.get_ref().clone())
        .ok_or_else(|| PampError::cache_connection("Identity cache is not configured"))?;

    if let CacheResult::Found(identity) = get_json::<Identity>(cache.as_ref(), &cache_key(token)).await
    {
        return Ok((identity, Credential(header.to_string())));
    }

    let directory = req
        .app_data::<web::Data<Arc<dyn UserDirectory>>>()
        .map(|d| d.get_ref().clone())
        .ok_or_else(|| PampError::directory_service("User directory is not configured"))?;

    let identity = directory.current_identity(header).await?;
    if !identity.is_active {
        return Err(PampError::authentication("User is not active"));
    }

    insert_json(cache.as_ref(), cache_key(token), &identity).await;
    Ok((identity, Credential(header.to_string())))
}

impl<S, B> Transform<S, ServiceRequest> for RequireIdentity
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireIdentityMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireIdentityMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireIdentityMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireIdentityMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 预检请求直接放行
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match resolve_identity(&req).await {
                Ok((identity, credential)) => {
                    debug!("Authenticated {} ({})", identity.user_id, identity.role);
                    req.extensions_mut().insert(identity);
                    req.extensions_mut().insert(credential);
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                Err(err) => {
                    let (status, code) = match &err {
                        PampError::Authentication(_) => {
                            info!("Authentication failed for {}: {}", req.path(), err);
                            (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized)
                        }
                        PampError::DirectoryService(_) => {
                            error!("User directory error for {}: {}", req.path(), err);
                            (StatusCode::BAD_GATEWAY, ErrorCode::UpstreamServiceError)
                        }
                        _ => {
                            error!("Identity resolution failed for {}: {}", req.path(), err);
                            (
                                StatusCode::INTERNAL_SERVER_ERROR,
                                ErrorCode::InternalServerError,
                            )
                        }
                    };
                    Ok(req.into_response(
                        create_error_response(status, code, &format!("Unauthorized: {}", err.message()))
                            .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

// 辅助函数：从请求扩展中读取身份
impl RequireIdentity {
    /// 当前调用方；只能在挂载了 RequireIdentity 的路由中使用
    pub fn extract_identity(req: &actix_web::HttpRequest) -> Option<Identity> {
        req.extensions().get::<Identity>().cloned()
    }

    pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<Uuid> {
        req.extensions().get::<Identity>().map(|i| i.user_id)
    }

    /// 原始 Authorization 头，用于转发给用户目录服务
    pub fn extract_credential(req: &actix_web::HttpRequest) -> Option<Credential> {
        req.extensions().get::<Credential>().cloned()
    }
}
