/*!
 * JWT 认证中间件
 *
 * 从 `Authorization: Bearer <token>` 中解析访问令牌，并通过 `AuthService`
 * 解析为活跃用户，写入请求扩展供处理程序使用。
 *
 * ```rust,ignore
 * web::scope("/api/v1/surveys")
 *     .wrap(RequireJWT)
 *     .route("", web::get().to(list_surveys))
 *
 * async fn list_surveys(req: HttpRequest) -> ActixResult<HttpResponse> {
 *     let actor = RequireJWT::current_user(&req)?;
 *     ...
 * }
 * ```
 *
 * 令牌缺失、无效、过期或用户已停用时返回 401。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpRequest, HttpResponse, ResponseError,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::Method,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{debug, info};

use crate::errors::{EvalSystemError, Result};
use crate::models::users::entities::User;
use crate::services::AuthService;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct RequireJWT;

// 提取 Bearer 令牌
fn bearer_token(req: &ServiceRequest) -> Result<&str> {
    req.headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| EvalSystemError::unauthenticated("Missing or invalid Authorization header"))
}

// 解析令牌得到活跃用户
async fn resolve_user(req: &ServiceRequest) -> Result<User> {
    let token = bearer_token(req)?.to_string();
    let auth = req
        .app_data::<web::Data<AuthService>>()
        .ok_or_else(|| EvalSystemError::configuration("AuthService not registered"))?
        .clone();
    auth.authenticate(&token).await
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::result::Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 预检请求直接放行
            if req.method() == Method::OPTIONS {
                return Ok(req.into_response(HttpResponse::NoContent().finish().map_into_right_body()));
            }

            match resolve_user(&req).await {
                Ok(user) => {
                    debug!("JWT authentication successful for ID: {}", user.id);
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(err.error_response().map_into_right_body()))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 从请求扩展中取出当前用户
    ///
    /// 只能在应用了 `RequireJWT` 的路由中使用，否则返回 `Unauthenticated`。
    pub fn current_user(req: &HttpRequest) -> Result<User> {
        req.extensions()
            .get::<User>()
            .cloned()
            .ok_or_else(|| EvalSystemError::unauthenticated("Authentication required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Storage, sea_orm_storage::SeaOrmStorage};
    use actix_web::{App, http::StatusCode, test};
    use std::sync::Arc;

    async fn whoami(req: HttpRequest) -> actix_web::Result<HttpResponse> {
        let user = RequireJWT::current_user(&req)?;
        Ok(HttpResponse::Ok().body(user.email))
    }

    #[actix_web::test]
    async fn test_missing_token_is_rejected() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await.unwrap());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AuthService::new(storage)))
                .service(
                    web::scope("/protected")
                        .wrap(RequireJWT)
                        .route("", web::get().to(whoami)),
                ),
        )
        .await;

        let req = test::TestRequest::get().uri("/protected").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/protected")
            .insert_header((AUTHORIZATION_HEADER, "Bearer not-a-jwt"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
