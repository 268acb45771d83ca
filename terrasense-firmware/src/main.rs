//! terrasense - Networked Soil & Temperature Sensor Node
//!
//! Firmware binary for ESP32-C3 boards. Samples a capacitive soil moisture
//! probe and a bus of DS18B20 temperature probes, blinks the status LED
//! while the soil is dry, and serves the readings over Wi-Fi as a status
//! page on `/` and a metrics scrape on `/metrics`.

#![no_std]
#![no_main]

extern crate alloc;

use defmt::*;
use embassy_executor::Spawner;
use esp_hal::clock::CpuClock;
use esp_hal::interrupt::software::SoftwareInterruptControl;
use esp_hal::timer::timg::TimerGroup;
use {defmt_rtt as _, panic_probe as _};

use terrasense_core::traits::{SensorPort, StatusLed, SystemInfo};
use terrasense_core::{PassReport, Scheduler};

use crate::net::{HttpListener, NodeListener};
use crate::system::EspSystem;

mod config;
mod net;
mod sensors;
mod system;

esp_bootloader_esp_idf::esp_app_desc!();

// Heap size: 72KB (Wi-Fi driver, network buffers and rendered pages)
const HEAP_SIZE: usize = 72 * 1024;

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    info!("terrasense firmware starting...");

    let peripherals = esp_hal::init(esp_hal::Config::default().with_cpu_clock(CpuClock::max()));
    esp_alloc::heap_allocator!(size: HEAP_SIZE);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt = SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);
    info!("Peripherals initialized");

    let node_config = config::node_config();
    info!(
        "Node {}.{} (moisture={}, temperature={})",
        node_config.identity.instance_id,
        node_config.identity.domain_suffix,
        node_config.features.moisture,
        node_config.features.temperature
    );

    let mut listener = if config::WIFI_SSID.is_empty() {
        warn!("No Wi-Fi SSID configured; running offline");
        NodeListener::Offline
    } else {
        match net::start(&spawner, peripherals.WIFI) {
            Some(stack) => {
                info!("Waiting for network configuration...");
                stack.wait_config_up().await;
                if let Some(cfg) = stack.config_v4() {
                    info!("Network up: address {}", cfg.address);
                }
                NodeListener::Online(HttpListener::new(stack))
            }
            None => NodeListener::Offline,
        }
    };

    let board = sensors::board(
        peripherals.ADC1,
        peripherals.GPIO2,
        peripherals.GPIO4,
        node_config.temperature.resolution,
    );
    let led = sensors::status_led(peripherals.GPIO8);

    let system = EspSystem;
    let mut scheduler = match Scheduler::start(&node_config, board, led, system.now()) {
        Ok(scheduler) => scheduler,
        // build.rs rejects bad node.toml values before they get here
        Err(err) => panic!("invalid node configuration: {}", err),
    };

    if let Some(temperature) = scheduler.state().temperature.as_ref() {
        info!(
            "Found {} temperature probes, conversion delay {} ms",
            temperature.probe_count(),
            temperature.delay_ms()
        );
    }
    info!("Entering main loop (free heap {} bytes)", system.heap_free_bytes());

    loop {
        let report = scheduler.pass(&mut listener, &system).await;
        log_report(&report, &scheduler);
    }
}

/// Serial trace of fresh readings
fn log_report<S: SensorPort, L: StatusLed>(report: &PassReport, scheduler: &Scheduler<S, L>) {
    if report.harvested {
        for reading in scheduler.state().temperatures() {
            info!(
                "Temperature({}) {} C, {} F",
                reading.index, reading.celsius, reading.fahrenheit
            );
        }
    }
    if let Some(sample) = report.sampled {
        debug!("Moisture {} ({}%)", sample.raw, sample.percent);
    }
}
