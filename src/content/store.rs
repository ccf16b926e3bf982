use chrono::NaiveDateTime;
use comment::{self, Comment};
use content::{Content, ContentFields, NewContent};
use db::schema::{content_tags, contents, favorites, follows, tags as tag_table, users};
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::{delete, insert_into, update};
use errors::*;
use slug::slugify;
use std::collections::HashMap;
use std::marker::PhantomData;
use tags::{self, Tag};
use types::{Listing, Page};
use users::models::User;
use utils::now;

#[derive(Debug, Queryable)]
struct ContentRow {
    id: i32,
    kind: String,
    slug: String,
    title: String,
    author_id: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
    deleted_at: Option<NaiveDateTime>,
}

#[derive(Insertable)]
#[table_name = "contents"]
struct NewContentRow<'a> {
    kind: &'static str,
    slug: &'a str,
    title: &'a str,
    author_id: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "favorites"]
struct NewFavorite {
    content_id: i32,
    user_id: i32,
    created_at: NaiveDateTime,
}

/// Which live rows of the kind a listing covers. Every variant filters
/// through a subselect, so no id list is ever sent as bind parameters.
enum Scope {
    All,
    Author(i32),
    Tag(i32),
    FavoritedBy(i32),
    FollowedBy(i32),
}

/// Rows hydrated per round of relation queries. Keeps each `IN (...)` well
/// below the backend's bind parameter limit.
const HYDRATE_BATCH: usize = 10_000;

/// Persistence for one content kind. Holds no state: every call takes the
/// connection it should run on, and multi-step writes run in a
/// transaction on that connection.
pub struct ContentStore<F> {
    kind: PhantomData<fn() -> F>,
}

impl<F> Clone for ContentStore<F> {
    fn clone(&self) -> Self {
        ContentStore { kind: PhantomData }
    }
}

impl<F> Copy for ContentStore<F> {}

impl<F: ContentFields> Default for ContentStore<F> {
    fn default() -> Self {
        ContentStore::new()
    }
}

impl<F: ContentFields> ContentStore<F> {
    pub fn new() -> ContentStore<F> {
        ContentStore { kind: PhantomData }
    }

    fn scoped(&self, scope: &Scope) -> contents::BoxedQuery<'static, Pg> {
        let query = contents::table
            .filter(contents::kind.eq(F::KIND.as_str()))
            .filter(contents::deleted_at.is_null())
            .into_boxed();
        match *scope {
            Scope::All => query,
            Scope::Author(author_id) => query.filter(contents::author_id.eq(author_id)),
            Scope::Tag(tag_id) => query.filter(
                contents::id.eq_any(
                    content_tags::table
                        .filter(content_tags::tag_id.eq(tag_id))
                        .select(content_tags::content_id),
                ),
            ),
            Scope::FavoritedBy(user_id) => query.filter(
                contents::id.eq_any(
                    favorites::table
                        .filter(favorites::user_id.eq(user_id))
                        .select(favorites::content_id),
                ),
            ),
            Scope::FollowedBy(follower_id) => query
                .filter(
                    contents::author_id.eq_any(
                        follows::table
                            .filter(follows::follower_id.eq(follower_id))
                            .select(follows::following_id),
                    ),
                )
                .filter(
                    contents::author_id.eq_any(
                        users::table
                            .filter(users::deleted_at.is_null())
                            .select(users::id),
                    ),
                ),
        }
    }

    pub fn get_by_slug(&self, slug: &str, conn: &PgConnection) -> Result<Option<Content<F>>> {
        let row = self
            .scoped(&Scope::All)
            .filter(contents::slug.eq(slug.to_owned()))
            .first::<ContentRow>(conn)
            .optional()?;
        match row {
            Some(row) => Ok(self.hydrate(vec![row], conn)?.pop()),
            None => Ok(None),
        }
    }

    /// Same as `get_by_slug`, but only finds items written by `author_id`.
    /// Someone else's item and a missing one both come back as `None`.
    pub fn get_owned_by_slug(
        &self,
        author_id: i32,
        slug: &str,
        conn: &PgConnection,
    ) -> Result<Option<Content<F>>> {
        let row = self
            .scoped(&Scope::Author(author_id))
            .filter(contents::slug.eq(slug.to_owned()))
            .first::<ContentRow>(conn)
            .optional()?;
        match row {
            Some(row) => Ok(self.hydrate(vec![row], conn)?.pop()),
            None => Ok(None),
        }
    }

    /// Inserts the item, its fields and its tags in one transaction and
    /// returns it fully loaded. A live item of this kind with the same slug
    /// is a `Conflict`.
    pub fn create<S: AsRef<str>>(
        &self,
        new: &NewContent<F>,
        raw_tags: &[S],
        conn: &PgConnection,
    ) -> Result<Content<F>> {
        conn.transaction::<_, Error, _>(|| {
            let at = now();
            let slug = new.slug();
            let row = NewContentRow {
                kind: F::KIND.as_str(),
                slug: &slug,
                title: &new.title,
                author_id: new.author_id,
                created_at: at,
                updated_at: at,
            };
            let id = insert_into(contents::table)
                .values(&row)
                .returning(contents::id)
                .get_result::<i32>(conn)
                .map_err(|e| conflict_or_fault(e, F::KIND.as_str(), &slug))?;

            new.fields.insert(id, conn)?;
            let resolved = tags::resolve(raw_tags, conn)?;
            tags::link(id, &resolved, conn)?;
            self.reload(id, conn)
        })
    }

    /// Writes title (re-deriving the slug) and fields, and replaces the tag
    /// set with `raw_tags`, in one transaction.
    pub fn update<S: AsRef<str>>(
        &self,
        content: &Content<F>,
        raw_tags: &[S],
        conn: &PgConnection,
    ) -> Result<Content<F>> {
        conn.transaction::<_, Error, _>(|| {
            let slug = slugify(&content.title);
            let target = contents::table
                .filter(contents::id.eq(content.id))
                .filter(contents::kind.eq(F::KIND.as_str()))
                .filter(contents::deleted_at.is_null());
            let updated = update(target)
                .set((
                    contents::slug.eq(&slug),
                    contents::title.eq(&content.title),
                    contents::updated_at.eq(now()),
                ))
                .execute(conn)
                .map_err(|e| conflict_or_fault(e, F::KIND.as_str(), &slug))?;
            if updated == 0 {
                bail!(ErrorKind::NotFound(F::KIND.as_str(), content.slug.clone()));
            }

            content.fields.update(content.id, conn)?;
            tags::unlink_all(content.id, conn)?;
            let resolved = tags::resolve(raw_tags, conn)?;
            tags::link(content.id, &resolved, conn)?;
            self.reload(content.id, conn)
        })
    }

    /// Soft delete. Tag links, favorites and comments are left as they
    /// are; the item just stops showing up. Deleting an item that is
    /// already gone is `NotFound` and keeps the first deletion time.
    pub fn delete(&self, content: &Content<F>, conn: &PgConnection) -> Result<()> {
        let deleted = update(
            contents::table
                .filter(contents::id.eq(content.id))
                .filter(contents::kind.eq(F::KIND.as_str()))
                .filter(contents::deleted_at.is_null()),
        ).set(contents::deleted_at.eq(Some(now())))
            .execute(conn)?;
        if deleted == 0 {
            bail!(ErrorKind::NotFound(F::KIND.as_str(), content.slug.clone()));
        }
        Ok(())
    }

    pub fn list(&self, page: Page, conn: &PgConnection) -> Result<Listing<Content<F>>> {
        self.page(&Scope::All, page, conn)
    }

    /// Items carrying `tag`. A tag that was never created is `NotFound`,
    /// unlike an existing tag with no items, which is an empty listing.
    pub fn list_by_tag(
        &self,
        tag: &str,
        page: Page,
        conn: &PgConnection,
    ) -> Result<Listing<Content<F>>> {
        let tag = match tags::load_by_name(tag, conn)? {
            Some(tag) => tag,
            None => bail!(ErrorKind::NotFound("tag", tag.to_owned())),
        };
        self.page(&Scope::Tag(tag.id), page, conn)
    }

    pub fn list_by_author(
        &self,
        username: &str,
        page: Page,
        conn: &PgConnection,
    ) -> Result<Listing<Content<F>>> {
        let author = User::require_by_name(username, conn)?;
        self.page(&Scope::Author(author.id), page, conn)
    }

    pub fn list_by_favoriter(
        &self,
        username: &str,
        page: Page,
        conn: &PgConnection,
    ) -> Result<Listing<Content<F>>> {
        let user = User::require_by_name(username, conn)?;
        self.page(&Scope::FavoritedBy(user.id), page, conn)
    }

    /// Items written by live users that `user_id` follows. The total counts
    /// the same followed-authors set; following nobody is an empty listing.
    pub fn list_feed(
        &self,
        user_id: i32,
        page: Page,
        conn: &PgConnection,
    ) -> Result<Listing<Content<F>>> {
        self.page(&Scope::FollowedBy(user_id), page, conn)
    }

    /// Comments only go on live items; a deleted one is `NotFound`.
    pub fn add_comment(
        &self,
        content: &Content<F>,
        author_id: i32,
        body: &str,
        conn: &PgConnection,
    ) -> Result<Comment> {
        self.require_live(content, conn)?;
        comment::add(content.id, author_id, body, conn)
    }

    /// Comments on the item at `slug`, oldest first. Empty if there is no
    /// such item.
    pub fn list_comments(&self, slug: &str, conn: &PgConnection) -> Result<Vec<Comment>> {
        let id = self
            .scoped(&Scope::All)
            .filter(contents::slug.eq(slug.to_owned()))
            .select(contents::id)
            .first::<i32>(conn)
            .optional()?;
        match id {
            Some(id) => comment::for_content(id, conn),
            None => Ok(Vec::new()),
        }
    }

    pub fn get_comment(&self, id: i32, conn: &PgConnection) -> Result<Option<Comment>> {
        comment::find(id, conn)
    }

    pub fn delete_comment(&self, comment: &Comment, conn: &PgConnection) -> Result<()> {
        comment::delete(comment, conn)
    }

    /// Returns `false` when `user_id` had already favorited the item.
    /// `content.favorited_by` is refreshed either way. A deleted item is
    /// `NotFound`.
    pub fn add_favorite(
        &self,
        content: &mut Content<F>,
        user_id: i32,
        conn: &PgConnection,
    ) -> Result<bool> {
        self.require_live(content, conn)?;
        let favorite = NewFavorite {
            content_id: content.id,
            user_id,
            created_at: now(),
        };
        let inserted = insert_into(favorites::table)
            .values(&favorite)
            .on_conflict_do_nothing()
            .execute(conn)?;
        content.favorited_by = favoriters(content.id, conn)?;
        Ok(inserted > 0)
    }

    /// Returns `false` when there was nothing to remove.
    pub fn remove_favorite(
        &self,
        content: &mut Content<F>,
        user_id: i32,
        conn: &PgConnection,
    ) -> Result<bool> {
        let removed = delete(
            favorites::table
                .filter(favorites::content_id.eq(content.id))
                .filter(favorites::user_id.eq(user_id)),
        ).execute(conn)?;
        content.favorited_by = favoriters(content.id, conn)?;
        Ok(removed > 0)
    }

    pub fn list_tags(&self, conn: &PgConnection) -> Result<Vec<Tag>> {
        tags::load_all(conn)
    }

    fn require_live(&self, content: &Content<F>, conn: &PgConnection) -> Result<()> {
        let live = self
            .scoped(&Scope::All)
            .filter(contents::id.eq(content.id))
            .select(contents::id)
            .first::<i32>(conn)
            .optional()?;
        match live {
            Some(_) => Ok(()),
            None => bail!(ErrorKind::NotFound(F::KIND.as_str(), content.slug.clone())),
        }
    }

    fn page(&self, scope: &Scope, page: Page, conn: &PgConnection) -> Result<Listing<Content<F>>> {
        let total_count = self.scoped(scope).count().get_result::<i64>(conn)?;

        let mut query = self
            .scoped(scope)
            .order((contents::created_at.desc(), contents::id.desc()))
            .offset(i64::from(page.offset));
        if let Some(limit) = page.limit {
            query = query.limit(i64::from(limit));
        }
        let rows = query.load::<ContentRow>(conn)?;

        Ok(Listing {
            items: self.hydrate(rows, conn)?,
            total_count,
        })
    }

    fn reload(&self, id: i32, conn: &PgConnection) -> Result<Content<F>> {
        let row = contents::table.find(id).first::<ContentRow>(conn)?;
        match self.hydrate(vec![row], conn)?.pop() {
            Some(content) => Ok(content),
            None => bail!(ErrorKind::NotFound(F::KIND.as_str(), id.to_string())),
        }
    }

    /// Attaches fields, author, tags and favoriting users to `rows` with
    /// one query per relation and batch. Row order is kept.
    fn hydrate(&self, rows: Vec<ContentRow>, conn: &PgConnection) -> Result<Vec<Content<F>>> {
        let mut fields = HashMap::new();
        let mut authors = HashMap::new();
        let mut tags_by_content = HashMap::new();
        let mut favorites_by_content = HashMap::new();

        for batch in rows.chunks(HYDRATE_BATCH) {
            let ids = batch.iter().map(|r| r.id).collect::<Vec<_>>();
            let mut author_ids = batch.iter().map(|r| r.author_id).collect::<Vec<_>>();
            author_ids.sort();
            author_ids.dedup();

            fields.extend(F::load(&ids, conn)?);
            authors.extend(
                users::table
                    .filter(users::id.eq_any(author_ids))
                    .load::<User>(conn)?
                    .into_iter()
                    .map(|u| (u.id, u)),
            );
            tags_by_content.extend(group(
                content_tags::table
                    .inner_join(tag_table::table)
                    .filter(content_tags::content_id.eq_any(ids.clone()))
                    .select((content_tags::content_id, tag_table::all_columns))
                    .order(tag_table::tag.asc())
                    .load::<(i32, Tag)>(conn)?,
            ));
            favorites_by_content.extend(group(
                favorites::table
                    .inner_join(users::table)
                    .filter(favorites::content_id.eq_any(ids))
                    .select((favorites::content_id, users::all_columns))
                    .order((favorites::created_at.asc(), users::id.asc()))
                    .load::<(i32, User)>(conn)?,
            ));
        }

        let mut loaded = Vec::with_capacity(rows.len());
        for row in rows {
            debug_assert!(row.kind == F::KIND.as_str() && row.deleted_at.is_none());
            let item_fields = match fields.remove(&row.id) {
                Some(f) => f,
                None => bail!(ErrorKind::NotFound(F::KIND.as_str(), row.slug)),
            };
            let author = match authors.get(&row.author_id) {
                Some(author) => author.clone(),
                None => bail!(ErrorKind::NotFound("user", row.author_id.to_string())),
            };
            loaded.push(Content {
                id: row.id,
                slug: row.slug,
                title: row.title,
                fields: item_fields,
                author,
                tags: tags_by_content.remove(&row.id).unwrap_or_default(),
                favorited_by: favorites_by_content.remove(&row.id).unwrap_or_default(),
                created_at: row.created_at,
                updated_at: row.updated_at,
            });
        }
        Ok(loaded)
    }
}

fn favoriters(content_id: i32, conn: &PgConnection) -> Result<Vec<User>> {
    let found = favorites::table
        .inner_join(users::table)
        .filter(favorites::content_id.eq(content_id))
        .select(users::all_columns)
        .order((favorites::created_at.asc(), users::id.asc()))
        .load::<User>(conn)?;
    Ok(found)
}

fn group<T>(pairs: Vec<(i32, T)>) -> HashMap<i32, Vec<T>> {
    let mut grouped = HashMap::new();
    for (id, item) in pairs {
        grouped.entry(id).or_insert_with(Vec::new).push(item);
    }
    grouped
}
