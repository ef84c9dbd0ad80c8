use std::io::ErrorKind;
use std::net::SocketAddr;
use std::sync::Mutex;

use bitcoin::bip32::DerivationPath;
use serde::de::DeserializeOwned;

use crate::connection::Connection;
use crate::protocol::{
    GetReceiveAddressParams, Request, SignMessageParams, SignTxParams, SignTxResult,
    VersionInfoResult,
};
use crate::{derivation_path_to_vec, try_parse_response, Error, Network, Result};

#[cfg(feature = "serial")]
use crate::consts::{BAUD_RATE, DEVICE_IDS, TIMEOUT};

/// A hardware signer with a blocking connection.
///
/// This is the main struct for interacting with the device. A session is
/// scoped to this value: the transport is opened by one of the `from_*`
/// constructors and closed when the value is dropped, [`Device::logout`]
/// additionally releases the wallet on the device side.
#[derive(Debug)]
pub struct Device {
    /// Device reached via emulator(tcp) or physical(serial)
    conn: Mutex<Connection>,

    /// The network the session was opened with
    network: Network,
}

impl Device {
    pub(crate) fn new(conn: Connection, network: Network) -> Self {
        Self {
            conn: Mutex::new(conn),
            network,
        }
    }

    pub fn from_socket(socket: SocketAddr, network: Network) -> Result<Self> {
        let stream = std::net::TcpStream::connect(socket)?;
        let conn = Connection::TcpStream(stream);
        Ok(Self::new(conn, network))
    }

    #[cfg(feature = "serial")]
    pub fn from_serial(
        network: Network,
        port_name: &str,
        timeout: Option<std::time::Duration>,
    ) -> Result<Self> {
        tracing::info!("serial port {port_name}");
        let timeout = timeout.unwrap_or(TIMEOUT);
        let port = serialport::new(port_name, BAUD_RATE)
            .timeout(timeout)
            .open()?;
        Ok(Self::new(port.into(), network))
    }

    /// Try to open a session on any available serial port, returning all of
    /// the attempts.
    #[cfg(feature = "serial")]
    pub fn from_any_serial(
        network: Network,
        timeout: Option<std::time::Duration>,
    ) -> Vec<Result<Self>> {
        let ports = Self::available_ports();
        tracing::debug!("available serial ports possibly with a signer: {}", ports.len());
        ports
            .iter()
            .map(|port| {
                let res = Self::from_serial(network, &port.port_name, timeout);
                tracing::debug!("trying: {port:?} return {res:?}");
                res
            })
            .collect()
    }

    /// Open a session on the first connected device.
    #[cfg(feature = "serial")]
    pub fn first_from_serial(
        network: Network,
        timeout: Option<std::time::Duration>,
    ) -> Result<Self> {
        Self::from_any_serial(network, timeout)
            .into_iter()
            .next()
            .ok_or(Error::NoAvailablePorts)?
    }

    #[cfg(feature = "serial")]
    pub fn available_ports() -> Vec<serialport::SerialPortInfo> {
        let ports = serialport::available_ports().unwrap_or_default();
        tracing::debug!("available serial ports: {}", ports.len());

        ports
            .into_iter()
            .filter(|e| {
                if let serialport::SerialPortType::UsbPort(val) = &e.port_type {
                    DEVICE_IDS.contains(&(val.vid, val.pid))
                } else {
                    false
                }
            })
            .collect()
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn ping(&self) -> Result<u8> {
        self.send(Request::Ping)
    }

    pub fn version_info(&self) -> Result<VersionInfoResult> {
        self.send(Request::GetVersionInfo)
    }

    pub fn logout(&self) -> Result<bool> {
        self.send(Request::Logout)
    }

    pub fn get_receive_address(&self, params: GetReceiveAddressParams) -> Result<String> {
        self.send(Request::GetReceiveAddress(params))
    }

    /// Address of the key at `path`, on the network of this session.
    pub fn address_at(&self, path: &DerivationPath) -> Result<String> {
        let params = GetReceiveAddressParams {
            network: self.network,
            path: derivation_path_to_vec(path),
        };
        self.get_receive_address(params)
    }

    /// Ask the device to sign `message` with the key at `path`.
    ///
    /// The returned signature is in the base64 form used by the usual
    /// signed-message verifiers.
    pub fn sign_message(&self, path: &DerivationPath, message: &str) -> Result<String> {
        let params = SignMessageParams {
            network: self.network,
            message: message.to_string(),
            path: derivation_path_to_vec(path),
        };
        self.send(Request::SignMessage(params))
    }

    /// Ask the device to sign the transaction described by `params`.
    ///
    /// The device displays the outputs and the implied fee, the call blocks
    /// until the user confirms or declines on the unit.
    pub fn sign_tx(&self, params: SignTxParams) -> Result<SignTxResult> {
        self.send(Request::SignTx(params))
    }

    fn check_network(&self, passed: Network) -> Result<()> {
        let init = self.network;
        if passed != init {
            Err(Error::MismatchingNetwork { init, passed })
        } else {
            Ok(())
        }
    }

    pub(crate) fn send<T>(&self, request: Request) -> Result<T>
    where
        T: std::fmt::Debug + DeserializeOwned,
    {
        if let Some(network) = request.network() {
            self.check_network(network)?;
        }
        let buf = request.serialize()?;

        let mut conn = self.conn.lock()?;

        conn.write_all(&buf)?;

        let mut rx = [0u8; 4096];

        let mut total = 0;
        loop {
            match conn.read(&mut rx[total..]) {
                Ok(len) => {
                    total += len;
                    let reader = &rx[..total];

                    if let Some(value) = try_parse_response(reader) {
                        return value;
                    }
                }
                Err(e) => {
                    if e.kind() != ErrorKind::Interrupted {
                        return Err(Error::IoError(e));
                    }
                }
            }
        }
    }
}
