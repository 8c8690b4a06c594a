//! Screens and layout components.

mod create_post;
mod home;
mod login;
mod profile;
mod shell;
mod user_posts;
mod users;

pub use create_post::CreatePost;
pub use home::Home;
pub use login::Login;
pub use profile::Profile;
pub use shell::{AppShell, AuthGuard};
pub use user_posts::UserPosts;
pub use users::Users;
