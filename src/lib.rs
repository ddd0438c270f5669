//! Weighted graph viewer with a force-directed layout and shortest-path highlighting.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

pub mod api;
pub mod components;
pub mod config;
pub mod error;
pub mod history;
pub mod input;
mod pages;

use crate::config::AppConfig;
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Sets up console logging and the panic hook. Call once before mounting.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Root component: page metadata, shared settings and the route table.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = AppConfig::from_env();
	info!("Shortest-path service at {}", config.api_base_url);
	provide_context(config);

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />
		<Title text="Shortest path viewer" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />
		<Meta name="description" content="Upload a weighted graph and see its shortest path" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
