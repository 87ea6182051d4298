//! Department and item handlers. All of them sit behind
//! [`require_identity`](crate::web::middleware::require_identity).

use axum::{
    extract::{Path, State},
    response::Response,
    Form, Json,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use super::{redirect_with_flash, AppState};
use crate::db::{DepartmentRepository, ItemRepository};
use crate::inventory;
use crate::web::dto::{
    AddItemPage, DepartmentPage, HomePage, ItemForm, Page, UpdateItemPage, UserInfo,
};
use crate::web::error::PageError;
use crate::web::flash::{self, FlashCategory};
use crate::web::middleware::CurrentUser;
use crate::DeptStockError;

/// Parse a numeric id from the path. Anything else names no record.
fn parse_id(raw: &str, not_found: &str) -> Result<i64, PageError> {
    raw.parse::<i64>().map_err(|_| PageError::not_found(not_found))
}

/// GET / - Department list.
pub async fn home(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Page<HomePage>>), PageError> {
    let departments = DepartmentRepository::new(state.db.pool()).list().await?;
    let (jar, flashes) = flash::take(jar);
    let page = HomePage {
        user: UserInfo::from(&user),
        departments,
    };
    Ok((jar, Json(Page::new(flashes, page))))
}

/// GET /department/:id - One department and its items.
pub async fn department_view(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Path(id): Path<String>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Page<DepartmentPage>>), PageError> {
    let id = parse_id(&id, "Department not found")?;
    let department = DepartmentRepository::new(state.db.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| PageError::not_found("Department not found"))?;
    let items = ItemRepository::new(state.db.pool())
        .list_by_department(id)
        .await?;

    let (jar, flashes) = flash::take(jar);
    Ok((jar, Json(Page::new(flashes, DepartmentPage { department, items }))))
}

/// GET /add_item - Add item form.
pub async fn add_item_page(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Page<AddItemPage>>), PageError> {
    let departments = DepartmentRepository::new(state.db.pool()).list().await?;
    let (jar, flashes) = flash::take(jar);
    Ok((jar, Json(Page::new(flashes, AddItemPage { departments }))))
}

/// POST /add_item - Create an item.
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
    Form(form): Form<ItemForm>,
) -> Result<Response, PageError> {
    // 0 never names a department; add_item reports it as unknown.
    let department_id = form.department_id.trim().parse::<i64>().unwrap_or(0);

    match inventory::add_item(state.db.pool(), department_id, &form.to_input()).await {
        Ok(item) => {
            tracing::debug!(item_id = item.id, user_id = user.id, "Item added by user");
            Ok(redirect_with_flash(
                jar,
                FlashCategory::Success,
                "Item added successfully!",
                &format!("/department/{}", item.department_id),
            ))
        }
        Err(DeptStockError::Validation(msg)) => Ok(redirect_with_flash(
            jar,
            FlashCategory::Danger,
            msg,
            "/add_item",
        )),
        Err(e) => Err(e.into()),
    }
}

/// GET /update_item/:id - Update form for one item.
pub async fn update_item_page(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Path(id): Path<String>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Page<UpdateItemPage>>), PageError> {
    let id = parse_id(&id, "Item not found")?;
    let item = ItemRepository::new(state.db.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| PageError::not_found("Item not found"))?;

    let (jar, flashes) = flash::take(jar);
    Ok((jar, Json(Page::new(flashes, UpdateItemPage { item }))))
}

/// POST /update_item/:id - Replace an item's fields.
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    jar: CookieJar,
    Form(form): Form<ItemForm>,
) -> Result<Response, PageError> {
    let id = parse_id(&id, "Item not found")?;
    match inventory::update_item(state.db.pool(), id, &form.to_input()).await {
        Ok(item) => {
            tracing::debug!(item_id = item.id, user_id = user.id, "Item updated by user");
            Ok(redirect_with_flash(
                jar,
                FlashCategory::Success,
                "Item updated successfully!",
                &format!("/department/{}", item.department_id),
            ))
        }
        Err(DeptStockError::Validation(msg)) => Ok(redirect_with_flash(
            jar,
            FlashCategory::Danger,
            msg,
            &format!("/update_item/{id}"),
        )),
        Err(e) => Err(e.into()),
    }
}
