table! {
    articles (content_id) {
        content_id -> Int4,
        description -> Text,
        body -> Text,
    }
}

table! {
    comments (id) {
        id -> Int4,
        content_id -> Int4,
        user_id -> Int4,
        body -> Text,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

table! {
    content_tags (content_id, tag_id) {
        content_id -> Int4,
        tag_id -> Int4,
    }
}

table! {
    contents (id) {
        id -> Int4,
        kind -> Text,
        slug -> Text,
        title -> Text,
        author_id -> Int4,
        created_at -> Timestamp,
        updated_at -> Timestamp,
        deleted_at -> Nullable<Timestamp>,
    }
}

table! {
    favorites (content_id, user_id) {
        content_id -> Int4,
        user_id -> Int4,
        created_at -> Timestamp,
    }
}

table! {
    follows (follower_id, following_id) {
        follower_id -> Int4,
        following_id -> Int4,
        created_at -> Timestamp,
    }
}

table! {
    media (content_id) {
        content_id -> Int4,
        description -> Text,
        studio -> Text,
        episodes -> Int4,
        media_type -> Text,
        poster -> Nullable<Text>,
        airing_date -> Timestamp,
    }
}

table! {
    tags (id) {
        id -> Int4,
        tag -> Text,
        created_at -> Timestamp,
    }
}

table! {
    users (id) {
        id -> Int4,
        username -> Varchar,
        email -> Text,
        password_hash -> Text,
        bio -> Nullable<Text>,
        image -> Nullable<Text>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
        deleted_at -> Nullable<Timestamp>,
    }
}

joinable!(articles -> contents (content_id));
joinable!(comments -> contents (content_id));
joinable!(comments -> users (user_id));
joinable!(content_tags -> contents (content_id));
joinable!(content_tags -> tags (tag_id));
joinable!(contents -> users (author_id));
joinable!(favorites -> contents (content_id));
joinable!(favorites -> users (user_id));
joinable!(media -> contents (content_id));

allow_tables_to_appear_in_same_query!(
    articles,
    comments,
    content_tags,
    contents,
    favorites,
    follows,
    media,
    tags,
    users,
);
