use axum::Router;

mod api;
mod uploads;

macro_rules! sub {
	($app:ident, $name:ident) => {
		$app = $app.nest(concat!("/", stringify!($name)), $name::configure())
	};
	($app:ident; $($name:ident),+) => {
		$(sub!($app, $name));+
	};
}
pub(crate) use sub;

pub fn configure() -> Router {
	let mut app = Router::new();

	sub!(app; api, uploads);

	app
}
