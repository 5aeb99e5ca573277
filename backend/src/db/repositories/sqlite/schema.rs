diesel::table! {
    articles (id) {
        id -> BigInt,
        title -> Text,
        author -> Text,
        content -> Text,
        created_at -> Timestamp,
        updated_at -> Timestamp,
        deleted_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    comments (id) {
        id -> BigInt,
        article_id -> BigInt,
        name -> Text,
        comment -> Text,
        created_at -> Timestamp,
        updated_at -> Timestamp,
        deleted_at -> Nullable<Timestamp>,
    }
}

diesel::joinable!(comments -> articles (article_id));

diesel::allow_tables_to_appear_in_same_query!(articles, comments,);
