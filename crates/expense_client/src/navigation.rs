use expense_shared::routes::Route;

/// Host callback that switches the visible view.
pub trait Navigator: Send + Sync {
    fn on_navigate(&self, pathname: &str);

    fn navigate_to(&self, route: Route) {
        self.on_navigate(route.path());
    }
}

impl<F> Navigator for F
where
    F: Fn(&str) + Send + Sync,
{
    fn on_navigate(&self, pathname: &str) {
        self(pathname)
    }
}
