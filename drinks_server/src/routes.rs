//! Request handler definitions
//!
//! Define each route and its handler here. Handlers that are more than a line or two should delegate to
//! [`DrinksApi`], which does the real work.
//!
//! Since each worker thread processes its requests sequentially, handlers must never block the current thread. Any
//! I/O (including database access) is expressed as futures.
//!
//! Routes that need a permission are declared with `where requires "<permission>"`. They are wrapped in the
//! authentication middleware, followed by the permission check, so that the handler only runs for callers whose
//! token grants that permission.
use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use drinks_engine::{
    db_types::{Drink, ShortDrink},
    DrinkManagement,
    DrinksApi,
};
use log::*;

use crate::{
    auth::JwtClaims,
    data_objects::{DeleteResponse, DrinksResponse, JsonResponse, NewDrinkRequest, UpdateDrinkRequest},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $bound:ty) => {
        paste::paste! { pub struct [<$name:camel Route>]<B>(core::marker::PhantomData<fn() -> B>);}
        paste::paste! { impl<B> [<$name:camel Route>]<B> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> B>)
            }
        }}
        paste::paste! { impl<B> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<B>
        where
            B: $bound + 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<B>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal impl $bound:ty where requires $permission:literal) => {
        paste::paste! { pub struct [<$name:camel Route>]<B>(core::marker::PhantomData<fn() -> B>);}
        paste::paste! { impl<B> [<$name:camel Route>]<B> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> B>)
            }
        }}
        paste::paste! { impl<B> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<B>
        where
            B: $bound + 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                // The last middleware added runs first
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<B>)
                    .wrap($crate::middleware::AclMiddlewareFactory::new($permission))
                    .wrap($crate::middleware::JwtAuthMiddlewareFactory);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().json(JsonResponse::success("👍️"))
}

/// Catch-all for requests that match no route.
pub async fn not_found(req: HttpRequest) -> Result<HttpResponse, ServerError> {
    debug!("💻️ No route for {} {}", req.method(), req.path());
    Err(ServerError::NoRecordFound(format!("{} {} is not a known endpoint", req.method(), req.path())))
}

//----------------------------------------------   Drinks  ----------------------------------------------------
route!(drinks => Get "/drinks" impl DrinkManagement);
/// Route handler for the public drinks menu.
///
/// Recipes are returned in their short form, which leaves out the ingredient names.
pub async fn drinks<B: DrinkManagement>(api: web::Data<DrinksApi<B>>) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET drinks");
    let drinks = fetch_all_drinks(api.as_ref()).await?;
    let drinks = drinks.iter().map(Drink::short).collect::<Vec<ShortDrink>>();
    Ok(HttpResponse::Ok().json(DrinksResponse::new(drinks)))
}

route!(drinks_detail => Get "/drinks-detail" impl DrinkManagement where requires "get:drinks-detail");
/// Route handler for the detailed drinks menu. The full recipe, including ingredient names, is returned.
pub async fn drinks_detail<B: DrinkManagement>(
    claims: JwtClaims,
    api: web::Data<DrinksApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET drinks-detail for {}", claims.sub);
    let drinks = fetch_all_drinks(api.as_ref()).await?;
    Ok(HttpResponse::Ok().json(DrinksResponse::new(drinks)))
}

async fn fetch_all_drinks<B: DrinkManagement>(api: &DrinksApi<B>) -> Result<Vec<Drink>, ServerError> {
    let drinks = api.drinks().await.map_err(|e| {
        debug!("💻️ Could not fetch drinks. {e}");
        ServerError::BackendError(e.to_string())
    })?;
    if drinks.is_empty() {
        return Err(ServerError::NoRecordFound("There are no drinks on the menu.".into()));
    }
    Ok(drinks)
}

route!(create_drink => Post "/drinks" impl DrinkManagement where requires "post:drinks");
/// Route handler for adding a drink to the menu.
///
/// Every recipe entry must have a `color`, `name` and `parts`, otherwise the drink is rejected and nothing is saved.
/// The new drink is returned in full.
pub async fn create_drink<B: DrinkManagement>(
    claims: JwtClaims,
    body: web::Json<NewDrinkRequest>,
    api: web::Data<DrinksApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let NewDrinkRequest { title, recipe } = body.into_inner();
    debug!("💻️ POST drink '{title}' for {}", claims.sub);
    let drink = api.create_drink(&title, &recipe).await?;
    info!("💻️ {} added {drink}", claims.sub);
    Ok(HttpResponse::Ok().json(DrinksResponse::new(vec![drink])))
}

route!(update_drink => Patch "/drinks/{id}" impl DrinkManagement where requires "patch:drinks");
/// Route handler for editing a drink. Only the fields present in the body are changed.
pub async fn update_drink<B: DrinkManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    body: web::Json<UpdateDrinkRequest>,
    api: web::Data<DrinksApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    let UpdateDrinkRequest { title, recipe } = body.into_inner();
    debug!("💻️ PATCH drink #{id} for {}", claims.sub);
    let drink = api.update_drink(id, title, recipe.as_deref()).await?;
    info!("💻️ {} updated {drink}", claims.sub);
    Ok(HttpResponse::Ok().json(DrinksResponse::new(vec![drink])))
}

route!(delete_drink => Delete "/drinks/{id}" impl DrinkManagement where requires "delete:drinks");
/// Route handler for removing a drink from the menu. Deletion is permanent.
pub async fn delete_drink<B: DrinkManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<DrinksApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ DELETE drink #{id} for {}", claims.sub);
    let id = api.delete_drink(id).await?;
    info!("💻️ {} deleted drink #{id}", claims.sub);
    Ok(HttpResponse::Ok().json(DeleteResponse::new(id)))
}
