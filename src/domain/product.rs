use std::num::NonZeroU32;

use bigdecimal::BigDecimal;
use uuid::Uuid;

/// A catalog entry as sold by one store.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub name: String,
    pub rate: BigDecimal,
    pub mrp: BigDecimal,
    /// Pieces per carton. `None` means the product is sold in pieces only.
    pub pack_size: Option<NonZeroU32>,
}

impl Product {
    /// Interpret a stored pack size; zero, negative or missing all mean "pieces only".
    pub fn pack_size_from_stored(stored: Option<i32>) -> Option<NonZeroU32> {
        stored
            .and_then(|n| u32::try_from(n).ok())
            .and_then(NonZeroU32::new)
    }

    pub fn sold_in_cartons(&self) -> bool {
        self.pack_size.is_some()
    }
}

/// A business that can place or receive orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Business {
    pub id: Uuid,
    pub name: String,
    pub owner_name: String,
    pub contact: Option<String>,
}
