use counter_service::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    App::new()
        .router(counters::router())
        .inject(CounterStore::new())
        .start()
        .await
}
