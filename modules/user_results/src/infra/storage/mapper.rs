use crate::contract::model::{ResultRecord, User};
use crate::infra::storage::entity::{result, user};

impl From<user::Model> for User {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            email: m.email,
            password: m.password,
            enabled: m.enabled,
        }
    }
}

/// Join a result row with its owner row into a contract record.
pub fn result_to_contract(row: result::Model, owner: user::Model) -> ResultRecord {
    ResultRecord {
        id: row.id,
        result: row.result,
        user: owner.into(),
        time: row.time,
    }
}
