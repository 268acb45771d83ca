//! Wi-Fi station, network stack and the HTTP listener
//!
//! The station task keeps the link up and rejoins after a disconnect. The
//! listener owns one TCP socket that stays listening on port 80 between loop
//! passes; each pass gives it a short window to accept a client, answers one
//! request and closes the connection.

use defmt::*;
use embassy_executor::Spawner;
use embassy_net::tcp::TcpSocket;
use embassy_net::{Config as NetConfig, DhcpConfig, Runner, Stack, StackResources};
use embassy_time::{with_timeout, Duration, Timer};
use embedded_io_async::Write as _;
use esp_hal::peripherals::WIFI;
use esp_hal::rng::Rng;
use esp_radio::wifi::{self, ClientConfig, ModeConfig, WifiController, WifiDevice, WifiEvent};
use esp_radio::Controller as RadioController;
use static_cell::StaticCell;

use terrasense_core::http::Response;
use terrasense_core::traits::{RequestHandler, RequestListener};
use terrasense_protocol::{find_head_end, parse_request, Method, ParseError, ResponseHead};

use crate::config::{INSTANCE_ID, WIFI_PASSWORD, WIFI_SSID};

pub const HTTP_PORT: u16 = 80;

/// How long one pass waits for a client to connect
const ACCEPT_WINDOW: Duration = Duration::from_millis(20);
/// Upper bound on reading a request and writing its response
const EXCHANGE_TIMEOUT: Duration = Duration::from_secs(2);
/// How long a closing connection may take to flush its FIN
const CLOSE_TIMEOUT: Duration = Duration::from_millis(200);
/// Largest request head accepted
const MAX_REQUEST_SIZE: usize = 1024;

const RX_BUF_SIZE: usize = 1024;
const TX_BUF_SIZE: usize = 2048;

static RADIO_CONTROLLER: StaticCell<RadioController<'static>> = StaticCell::new();
static NET_RESOURCES: StaticCell<StackResources<3>> = StaticCell::new();
static RX_BUF: StaticCell<[u8; RX_BUF_SIZE]> = StaticCell::new();
static TX_BUF: StaticCell<[u8; TX_BUF_SIZE]> = StaticCell::new();

/// Bring up the radio and the DHCP network stack, spawning their tasks
pub fn start(spawner: &Spawner, wifi_peripheral: WIFI<'static>) -> Option<Stack<'static>> {
    let radio = match esp_radio::init() {
        Ok(ctrl) => ctrl,
        Err(err) => {
            error!("Wi-Fi radio init failed: {:?}", err);
            return None;
        }
    };
    let radio_ctrl = RADIO_CONTROLLER.init(radio);

    let (controller, interfaces) = match wifi::new(radio_ctrl, wifi_peripheral, Default::default())
    {
        Ok(v) => v,
        Err(err) => {
            error!("Wi-Fi driver init failed: {:?}", err);
            return None;
        }
    };

    let mut dhcp = DhcpConfig::default();
    dhcp.hostname = heapless::String::try_from(INSTANCE_ID).ok();

    let rng = Rng::new();
    let seed = (u64::from(rng.random()) << 32) | u64::from(rng.random());

    let resources = NET_RESOURCES.init(StackResources::new());
    let (stack, runner) =
        embassy_net::new(interfaces.sta, NetConfig::dhcpv4(dhcp), resources, seed);

    if spawner.spawn(wifi_task(controller)).is_err() {
        error!("failed to spawn Wi-Fi task");
        return None;
    }
    if spawner.spawn(net_task(runner)).is_err() {
        error!("failed to spawn network task");
        return None;
    }

    Some(stack)
}

#[embassy_executor::task]
async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await;
}

/// Join the configured network and rejoin whenever the link drops
#[embassy_executor::task]
async fn wifi_task(mut controller: WifiController<'static>) {
    info!("Wi-Fi task starting (ssid=\"{}\")", WIFI_SSID);

    loop {
        if !matches!(controller.is_started(), Ok(true)) {
            let client_config = ModeConfig::Client(
                ClientConfig::default()
                    .with_ssid(WIFI_SSID.into())
                    .with_password(WIFI_PASSWORD.into()),
            );
            if let Err(err) = controller.set_config(&client_config) {
                warn!("Wi-Fi set_config error: {:?}", err);
                Timer::after(Duration::from_secs(10)).await;
                continue;
            }

            info!("Starting Wi-Fi STA");
            if let Err(err) = controller.start_async().await {
                warn!("Wi-Fi start error: {:?}", err);
                Timer::after(Duration::from_secs(10)).await;
                continue;
            }
        }

        match controller.connect_async().await {
            Ok(()) => {
                info!("Wi-Fi connected");
                controller.wait_for_event(WifiEvent::StaDisconnected).await;
                warn!("Wi-Fi disconnected; will retry");
                Timer::after(Duration::from_secs(5)).await;
            }
            Err(err) => {
                warn!("Wi-Fi connect error: {:?}", err);
                Timer::after(Duration::from_secs(10)).await;
            }
        }
    }
}

/// Why an exchange was dropped
#[derive(Debug, Format)]
enum ExchangeError {
    Tcp(embassy_net::tcp::Error),
    /// The client closed before sending a full head
    Closed,
    Head(ParseError),
}

impl From<embassy_net::tcp::Error> for ExchangeError {
    fn from(err: embassy_net::tcp::Error) -> Self {
        ExchangeError::Tcp(err)
    }
}

impl From<ParseError> for ExchangeError {
    fn from(err: ParseError) -> Self {
        ExchangeError::Head(err)
    }
}

/// One listening socket on [`HTTP_PORT`]
pub struct HttpListener {
    socket: TcpSocket<'static>,
    request: [u8; MAX_REQUEST_SIZE],
}

impl HttpListener {
    pub fn new(stack: Stack<'static>) -> Self {
        let rx = RX_BUF.init([0; RX_BUF_SIZE]);
        let tx = TX_BUF.init([0; TX_BUF_SIZE]);
        let mut socket = TcpSocket::new(stack, rx, tx);
        socket.set_timeout(Some(EXCHANGE_TIMEOUT));
        Self {
            socket,
            request: [0; MAX_REQUEST_SIZE],
        }
    }

    /// Read one request head, answer it and flush
    async fn exchange<H: RequestHandler>(&mut self, handler: &H) -> Result<(), ExchangeError> {
        let mut total = 0usize;
        let head_end = loop {
            let n = self.socket.read(&mut self.request[total..]).await?;
            if n == 0 {
                return Err(ExchangeError::Closed);
            }
            total += n;
            if let Some(end) = find_head_end(&self.request[..total]) {
                break end;
            }
            if total == self.request.len() {
                break total;
            }
        };

        let (response, send_body) = match parse_request(&self.request[..head_end]) {
            Ok(request) => {
                info!("{} {}", request.method.as_str(), request.target);
                (handler.handle(&request), request.method != Method::Head)
            }
            Err(err) => {
                warn!("rejected request head: {:?}", err);
                (Response::bad_request(), true)
            }
        };

        let head =
            ResponseHead::new(response.status, response.content_type, response.body.len())
                .encode()?;
        self.socket.write_all(head.as_bytes()).await?;
        if send_body {
            self.socket.write_all(response.body.as_bytes()).await?;
        }
        self.socket.flush().await?;
        Ok(())
    }
}

impl RequestListener for HttpListener {
    async fn service_once<H: RequestHandler>(&mut self, handler: &H) {
        match with_timeout(ACCEPT_WINDOW, self.socket.accept(HTTP_PORT)).await {
            // Nobody connected; the socket keeps listening
            Err(_) => return,
            Ok(Err(err)) => {
                warn!("HTTP accept error: {:?}", err);
                self.socket.abort();
                return;
            }
            Ok(Ok(())) => {}
        }

        match with_timeout(EXCHANGE_TIMEOUT, self.exchange(handler)).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!("HTTP exchange dropped: {:?}", err),
            Err(_) => warn!("HTTP exchange timed out"),
        }

        self.socket.close();
        let _ = with_timeout(CLOSE_TIMEOUT, self.socket.flush()).await;
        // Reset whatever is left so the next accept can listen again
        self.socket.abort();
    }
}

/// The listener the loop services: real sockets, or a pause when the node
/// has no network
pub enum NodeListener {
    Online(HttpListener),
    Offline,
}

impl RequestListener for NodeListener {
    async fn service_once<H: RequestHandler>(&mut self, handler: &H) {
        match self {
            NodeListener::Online(http) => http.service_once(handler).await,
            NodeListener::Offline => Timer::after(ACCEPT_WINDOW).await,
        }
    }
}
