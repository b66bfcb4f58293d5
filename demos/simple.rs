use std::{sync::Arc, time::SystemTime};

use mixdi::*;

// Define regular traits and implementor structs

trait Logger: Send + Sync {
    fn log(&self, content: &str);
}

trait DateLogger: Send + Sync {
    fn log_date(&self);
}

struct LoggerImpl;

impl Logger for LoggerImpl {
    fn log(&self, content: &str) {
        println!("{}", content);
    }
}

struct DateLoggerImpl {
    logger: Arc<Box<dyn Logger>>,
}

impl DateLogger for DateLoggerImpl {
    fn log_date(&self) {
        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default();
        self.logger.log(&format!("{}s since epoch", now.as_secs()));
    }
}

// Declare the components

const LOGGER: Component<Box<dyn Logger>> = Component::new("logger");
const DATE_LOGGER: Component<Box<dyn DateLogger>> = Component::new("dateLogger");

fn main() -> Result<(), MixError> {
    let date_logger = DATE_LOGGER.try_provide(|deps| {
        let logger = deps.get(&LOGGER)?;
        Ok(Box::new(DateLoggerImpl { logger }) as Box<dyn DateLogger>)
    });
    let logger = LOGGER.provide(|_| Box::new(LoggerImpl) as Box<dyn Logger>);

    let app = mixer([date_logger, logger]).make()?;

    app.get(&DATE_LOGGER)?.log_date();

    Ok(())
}
