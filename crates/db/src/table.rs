use sea_query::Iden;

#[derive(Iden, Clone, Copy)]
pub enum Products {
    Table,
    UserId,
    ProductName,
    Quantity,
    Unit,
    ExpiryDate,
    AddedDate,
}

#[derive(Iden, Clone, Copy)]
pub enum Logs {
    Table,
    UserId,
    ProductName,
    DeltaQty,
    Unit,
    Action,
    Timestamp,
}

#[derive(Iden, Clone, Copy)]
pub enum Shopping {
    Table,
    UserId,
    Item,
    Quantity,
    Unit,
    Note,
    AddedDate,
}
