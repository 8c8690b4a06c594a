//! Application routing configuration.

use dioxus::prelude::*;

use crate::views::{AppShell, AuthGuard, CreatePost, Home, Login, Profile, UserPosts, Users};

// Router configuration
#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    // Shell installs the cross-tab auth sync listener and the theme class
    #[layout(AppShell)]
        // Landing page redirects to login or users
        #[route("/")]
        Home {},

        #[route("/login")]
        Login {},

        // Authenticated area
        #[layout(AuthGuard)]
            #[route("/users")]
            Users {},
            #[route("/users/:user_id")]
            UserPosts { user_id: i64 },
            #[route("/posts/new")]
            CreatePost {},
            #[route("/profile")]
            Profile {},
}
