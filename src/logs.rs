use log::LevelFilter;
use log4rs::{
    Config,
    append::{
        console::{ConsoleAppender, Target},
        rolling_file::policy::compound::{
            CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
        },
    },
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
};

const LOG_SIZE_LIMIT: u64 = 10 * 1024 * 1024; // 10 MB

const LOG_FILE_COUNT: u32 = 3;

pub fn init_logger() {
    let file_path =
        std::env::var("PELADA_LOG_FILE").unwrap_or_else(|_| "logs/pelada.log".to_string());
    let archive_pattern = std::env::var("PELADA_LOG_ARCHIVE")
        .unwrap_or_else(|_| "logs/pelada.{}.log.gz".to_string());

    let stderr_level = LevelFilter::Info;
    let file_level = LevelFilter::Debug;

    let stderr = ConsoleAppender::builder().target(Target::Stderr).build();

    let trigger = SizeTrigger::new(LOG_SIZE_LIMIT);
    let roller = FixedWindowRoller::builder()
        .build(&archive_pattern, LOG_FILE_COUNT)
        .expect("Failed to build log roller");
    let policy = CompoundPolicy::new(Box::new(trigger), Box::new(roller));

    let logfile = log4rs::append::rolling_file::RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{l} - {m}\n")))
        .build(file_path, Box::new(policy))
        .expect("Failed to build log file appender");

    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(file_level)))
                .build("logfile", Box::new(logfile)),
        )
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(stderr_level)))
                .build("stderr", Box::new(stderr)),
        )
        .build(
            Root::builder()
                .appender("logfile")
                .appender("stderr")
                .build(LevelFilter::Trace),
        )
        .expect("Failed to build logger config");

    let _handle = log4rs::init_config(config).expect("Failed to initialize logger");
}
