//! ESP32-C6 firmware entry point.
//!
//! Boot order: HAL + scheduler, radio and IP stack, broker task, then
//! the interactive UI loop on the main task. The OLED and the gesture
//! sensor share one I2C bus. Any fatal error ends in a software reset,
//! which also resets the shared state by construction.

#![no_std]
#![no_main]

use core::cell::RefCell;
use core::convert::Infallible;

use defmt::{error, info};
use embassy_executor::Spawner;
use embassy_net::StackResources;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embedded_hal_bus::i2c::RefCellDevice;
use esp_hal::clock::CpuClock;
use esp_hal::i2c::master::{Config as I2cConfig, I2c};
use esp_hal::interrupt::software::SoftwareInterruptControl;
use esp_hal::peripherals::Peripherals;
use esp_hal::rng::Rng;
use esp_hal::timer::timg::TimerGroup;
use esp_radio::Controller;
use static_cell::StaticCell;

use swipecast::driver::apds9960::GestureSensor;
use swipecast::error::Error;
use swipecast::gesture::GestureInput;
use swipecast::net::{mqtt, wifi};
use swipecast::state::WeatherState;
use swipecast::ui::display::Oled;
use swipecast::ui::engine;

esp_bootloader_esp_idf::esp_app_desc!();

use panic_rtt_target as _;

type SharedState = WeatherState<CriticalSectionRawMutex>;

static STATE: StaticCell<SharedState> = StaticCell::new();
static RADIO: StaticCell<Controller> = StaticCell::new();
static STACK_RESOURCES: StaticCell<StackResources<4>> = StaticCell::new();

#[esp_rtos::main]
async fn main(spawner: Spawner) {
    rtt_target::rtt_init_defmt!();

    let peripherals = esp_hal::init(esp_hal::Config::default().with_cpu_clock(CpuClock::max()));
    esp_alloc::heap_allocator!(size: 64 * 1024);

    let timg0 = TimerGroup::new(unsafe { peripherals.TIMG0.clone_unchecked() });
    let sw_interrupt =
        SoftwareInterruptControl::new(unsafe { peripherals.SW_INTERRUPT.clone_unchecked() });
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    info!("swipecast starting...");

    let state = STATE.init(WeatherState::new());

    let err = match run(spawner, peripherals, state).await {
        Ok(never) => match never {},
        Err(err) => err,
    };

    error!("Fatal error: {}, restarting", err);
    esp_hal::system::software_reset()
}

async fn run(
    spawner: Spawner,
    peripherals: Peripherals,
    state: &'static SharedState,
) -> Result<Infallible, Error> {
    // Radio + IP stack.
    let radio = RADIO.init(esp_radio::init().map_err(|_| Error::Network)?);
    let (mut controller, interfaces) =
        esp_radio::wifi::new(radio, peripherals.WIFI, Default::default())
            .map_err(|_| Error::Network)?;

    let mut rng = Rng::new();
    let mut seed_bytes = [0u8; 8];
    rng.read(&mut seed_bytes);
    let seed = u64::from_le_bytes(seed_bytes);

    let net_config = embassy_net::Config::dhcpv4(Default::default());
    let (stack, runner) = embassy_net::new(
        interfaces.sta,
        net_config,
        STACK_RESOURCES.init(StackResources::new()),
        seed,
    );

    spawner
        .spawn(wifi::stack_task(runner))
        .map_err(|_| Error::Network)?;
    wifi::configure(&mut controller)?;
    spawner
        .spawn(wifi::connection_task(controller, stack))
        .map_err(|_| Error::Network)?;
    spawner
        .spawn(broker_task(stack, state))
        .map_err(|_| Error::Broker)?;

    // One I2C bus for both the OLED and the gesture sensor.
    let i2c = I2c::new(peripherals.I2C0, I2cConfig::default())
        .map_err(|_| Error::Display)?
        .with_sda(peripherals.GPIO6)
        .with_scl(peripherals.GPIO7);
    let bus = RefCell::new(i2c);

    let mut panel = Oled::new(RefCellDevice::new(&bus))?;
    let sensor = GestureSensor::new(RefCellDevice::new(&bus))?;
    let mut input = GestureInput::new(sensor);

    engine::run(state, &mut panel, &mut input).await
}

/// Network task: broker session until a fatal error, then restart the
/// whole device.
#[embassy_executor::task]
async fn broker_task(stack: embassy_net::Stack<'static>, state: &'static SharedState) {
    let err = match mqtt::broker_session(stack, state).await {
        Ok(never) => match never {},
        Err(err) => err,
    };
    error!("Broker session failed: {}, restarting", err);
    esp_hal::system::software_reset()
}
