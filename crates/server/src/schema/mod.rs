pub mod comment;
pub mod file;
pub mod folder;
pub mod like;
pub mod project;
pub mod report;
pub mod user;

use async_graphql::{EmptySubscription, MergedObject, Schema};
use sqlx::SqlitePool;

use crate::config::Config;

#[derive(MergedObject, Default)]
pub struct QueryRoot(
    user::UserQuery,
    project::ProjectQuery,
    folder::FolderQuery,
    file::FileQuery,
    like::LikeQuery,
    comment::CommentQuery,
    report::ReportQuery,
);

#[derive(MergedObject, Default)]
pub struct MutationRoot(
    user::UserMutation,
    project::ProjectMutation,
    folder::FolderMutation,
    file::FileMutation,
    like::LikeMutation,
    comment::CommentMutation,
    report::ReportMutation,
);

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(pool: SqlitePool, config: Config) -> AppSchema {
    Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    )
    .data(pool)
    .data(config)
    .finish()
}
