use diesel::prelude::*;
use uuid::Uuid;

use crate::schema::notifications;

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = notifications)]
pub struct NewNotification {
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub notification_type: String,
    pub priority: String,
    pub is_read: bool,
}

impl NewNotification {
    pub fn security_alert(user_id: Uuid, title: String, message: String) -> Self {
        Self {
            user_id,
            title,
            message,
            notification_type: "security_alert".to_string(),
            priority: "high".to_string(),
            is_read: false,
        }
    }
}
