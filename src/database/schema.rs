// Table definitions for the embedded migrations in migrations/.
// Keep in sync with up.sql when the schema changes.

diesel::table! {
    pending_orders (id) {
        id -> BigInt,
        buyer_qty -> Text,
        buyer_price -> Text,
        seller_qty -> Text,
        seller_price -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    completed_orders (id) {
        id -> BigInt,
        price -> Text,
        qty -> Text,
        buyer_order_id -> BigInt,
        seller_order_id -> BigInt,
        executed_at -> Timestamp,
    }
}

diesel::allow_tables_to_appear_in_same_query!(pending_orders, completed_orders,);
