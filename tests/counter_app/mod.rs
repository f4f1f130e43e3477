use counter_service::prelude::*;

pub fn app() -> App {
    App::new()
        .router(counters::router())
        .inject(CounterStore::new())
}
