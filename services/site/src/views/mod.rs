//! Server-rendered HTML for every page the site serves.

mod components;
mod content;
mod layout;
mod pages;

pub(crate) use pages::{
    blog_index, blog_post, directory, error_page, home, professional, sitemap, static_page,
};

pub(crate) const STYLESHEET: &str = include_str!("../../static/site.css");
