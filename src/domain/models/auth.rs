use serde::{Deserialize, Serialize};

/// Role tags as minted by the external identity provider. The set is fixed
/// at compile time; nothing in this service creates or mutates roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Customer,
    Shop,
}

impl Role {
    pub fn from_tag(tag: i32) -> Option<Self> {
        match tag {
            1 => Some(Self::Customer),
            2 => Some(Self::Shop),
            _ => None,
        }
    }
}

/// Claims carried by the identity provider's access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: i32,
    pub exp: usize,
}

/// The authenticated caller. The identity provider's stable id doubles as
/// the shop id for shop-role principals.
#[derive(Debug, Clone, Copy)]
pub struct Principal {
    pub user_id: i64,
    pub role: Role,
}

impl Principal {
    pub fn is_shop(&self) -> bool {
        self.role == Role::Shop
    }
}
