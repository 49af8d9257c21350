use std::{sync::Arc, time::SystemTime};

use tracing_subscriber::EnvFilter;
use tsuna::*;

// Define regular traits and implementor structs

trait Logger: Send + Sync {
    fn log(&self, content: &str);
}

trait DateLogger: Send + Sync {
    fn log_date(&self) -> Result<()>;
}

struct LoggerImpl {
    prefix: String,
}

impl Logger for LoggerImpl {
    fn log(&self, content: &str) {
        println!("{}{}", self.prefix, content);
    }
}

struct DateLoggerImpl {
    logger: Arc<dyn Logger>,
}

impl DateLoggerImpl {
    fn new(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }
}

impl DateLogger for DateLoggerImpl {
    fn log_date(&self) -> Result<()> {
        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_err(WiringError::provider)?;
        self.logger.log(&format!("{}s since epoch", now.as_secs()));
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut container = Container::new();

    // The logger is shared, each date logger is built on demand
    container.bind_named("prefix", |_| Ok(String::from("[demo] ")));
    container.bind_singleton(|c: &Container| {
        let prefix: String = c.make_named("prefix")?;
        Ok(Arc::new(LoggerImpl { prefix }) as Arc<dyn Logger>)
    });
    container.bind(|c: &Container| {
        Ok(Arc::new(DateLoggerImpl::new(c.make()?)) as Arc<dyn DateLogger>)
    });

    // No effect, a logger is already bound
    container.bind_if(|_| {
        Ok(Arc::new(LoggerImpl {
            prefix: String::new(),
        }) as Arc<dyn Logger>)
    });

    let b: Arc<dyn DateLogger> = container.make()?;
    b.log_date()?;

    println!("{container:?}");
    Ok(())
}
