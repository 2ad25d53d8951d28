use super::UserService;
use crate::capability::{Action, Target, authorize};
use crate::errors::Result;
use crate::models::users::{entities::User, responses::UserDetail};
use crate::services::found;

pub async fn get_user(service: &UserService, actor: &User, user_id: i64) -> Result<UserDetail> {
    let storage = service.storage();
    let user = found(storage.get_user_by_id(user_id).await?, "User", user_id)?;
    authorize(actor, Action::UserRead, Target::User(&user))?;

    let department_name = match user.department_id {
        Some(id) => storage
            .get_department_by_id(id)
            .await?
            .map(|department| department.name),
        None => None,
    };

    Ok(UserDetail::new(user, department_name))
}
