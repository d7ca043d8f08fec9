//! RustSerialCli - firmware entry point
//!
//! 1. CLI UART on UART1, log UART on UART2
//! 2. Receive task (high priority) assembles lines into the mailbox
//! 3. Logger task drains both log streams
//! 4. Main task runs the dispatch loop forever

#[cfg(target_os = "espidf")]
mod firmware {
    use core::cell::RefCell;

    use esp_idf_svc::hal::gpio::{AnyIOPin, OutputPin};
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::hal::task::thread::ThreadSpawnConfiguration;
    use esp_idf_svc::hal::uart::{config::Config, UartDriver};
    use esp_idf_svc::hal::units::Hertz;
    use esp_idf_svc::sys::{EspError, ESP_ERR_INVALID_STATE, ESP_FAIL};

    use rust_serial_cli::config::CliConfig;
    use rust_serial_cli::console::{CommandProcessor, DispatchLoop, LineMailbox, LineReceiver, Registry};
    use rust_serial_cli::hal::{receive_loop, GpioLeds, TaskWaiter, UartSink};
    use rust_serial_cli::uart_logger::{init_uart_logger, uart_logger_task, UartLoggerConfig};
    use rust_serial_cli::{cli_info, BuiltinCommands, CliStats, TASK_LOG_STREAM};

    /// Receive task priority, above the main task.
    const RX_TASK_PRIORITY: u8 = 10;

    static MAILBOX: LineMailbox = LineMailbox::new();
    static STATS: CliStats = CliStats::new();

    fn spawn_failed(_: std::io::Error) -> EspError {
        EspError::from_infallible::<ESP_FAIL>()
    }

    pub fn main() -> Result<(), EspError> {
        esp_idf_svc::sys::link_patches();

        let peripherals = Peripherals::take()?;
        let pins = peripherals.pins;
        let cli_config = CliConfig::default();
        let logger_config = UartLoggerConfig::default();

        // Log UART first so startup problems are visible
        let log_tx = init_uart_logger(peripherals.uart2, pins.gpio6, &logger_config)?;
        std::thread::Builder::new()
            .stack_size(logger_config.stack_size)
            .spawn(move || {
                let mut sink = UartSink::new(log_tx, cli_config.tx_timeout_ms);
                uart_logger_task(&mut sink)
            })
            .map_err(spawn_failed)?;

        let uart_config = Config::default().baudrate(Hertz(cli_config.baud_rate));
        let uart = UartDriver::new(
            peripherals.uart1,
            pins.gpio17,
            pins.gpio18,
            Option::<AnyIOPin>::None,
            Option::<AnyIOPin>::None,
            &uart_config,
        )?;
        let (tx, mut rx) = uart.into_split();

        let (producer, consumer) = MAILBOX
            .split()
            .ok_or_else(EspError::from_infallible::<ESP_ERR_INVALID_STATE>)?;

        // The waiter belongs to this task, the waker goes to the receive task
        let mut waiter = TaskWaiter::new();
        let waker = waiter.waker();

        ThreadSpawnConfiguration {
            name: Some(b"cli_rx\0".as_slice()),
            priority: RX_TASK_PRIORITY,
            ..Default::default()
        }
        .set()?;
        std::thread::Builder::new()
            .stack_size(cli_config.rx_stack_size)
            .spawn(move || {
                let mut receiver = LineReceiver::new(producer, waker, &STATS);
                receive_loop(&mut rx, &mut receiver)
            })
            .map_err(spawn_failed)?;
        ThreadSpawnConfiguration::default().set()?;

        let leds = RefCell::new(GpioLeds::new(
            pins.gpio4.downgrade_output(),
            pins.gpio5.downgrade_output(),
            pins.gpio7.downgrade_output(),
            pins.gpio15.downgrade_output(),
        )?);
        let builtins = BuiltinCommands::new(&leds);
        let table = builtins.descriptors();
        let registry = Registry::new(&table);

        let processor = CommandProcessor::new(registry, &STATS);
        let mut dispatch: DispatchLoop<'_> = DispatchLoop::new(consumer, processor, &STATS);
        let mut sink = UartSink::new(tx, cli_config.tx_timeout_ms);

        cli_info!(TASK_LOG_STREAM, "{} ready", env!("VERSION_STRING"));
        dispatch.announce(&mut sink);
        dispatch.run(&mut waiter, &mut sink)
    }
}

#[cfg(target_os = "espidf")]
fn main() -> Result<(), esp_idf_svc::sys::EspError> {
    firmware::main()
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!("rust-serial-cli runs on ESP-IDF targets only");
}
