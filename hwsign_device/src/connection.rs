use std::{
    io::{self, Read, Write},
    net::TcpStream,
};

/// Byte transport the device is reached through.
#[derive(Debug)]
pub enum Connection {
    /// Emulator or mock, also what the test suite uses.
    TcpStream(TcpStream),

    #[cfg(feature = "serial")]
    Serial(Box<dyn serialport::SerialPort>),

    /// Replays canned read results, one per read call.
    #[cfg(test)]
    Replay {
        chunks: std::collections::VecDeque<io::Result<Vec<u8>>>,
    },
}

impl Connection {
    pub fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self {
            Connection::TcpStream(stream) => stream.write_all(buf),

            #[cfg(feature = "serial")]
            Connection::Serial(port) => port.write_all(buf),

            #[cfg(test)]
            Connection::Replay { .. } => Ok(()),
        }
    }

    pub fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Connection::TcpStream(stream) => stream.read(buf),

            #[cfg(feature = "serial")]
            Connection::Serial(port) => port.read(buf),

            #[cfg(test)]
            Connection::Replay { chunks } => match chunks.pop_front() {
                Some(Ok(data)) => {
                    buf[..data.len()].copy_from_slice(&data);
                    Ok(data.len())
                }
                Some(Err(e)) => Err(e),
                None => Ok(0),
            },
        }
    }
}

impl From<TcpStream> for Connection {
    fn from(stream: TcpStream) -> Self {
        Connection::TcpStream(stream)
    }
}

#[cfg(feature = "serial")]
impl From<Box<dyn serialport::SerialPort>> for Connection {
    fn from(port: Box<dyn serialport::SerialPort>) -> Self {
        Connection::Serial(port)
    }
}

#[cfg(test)]
mod test {
    use std::collections::VecDeque;
    use std::io;

    use serde_cbor::Value;

    use crate::protocol::Response;
    use crate::Device;

    use super::Connection;

    // A response split over several reads, with a spurious interruption in
    // the middle, must still be parsed.
    #[test]
    fn response_across_partial_reads() {
        let resp = Response {
            id: "0".to_string(),
            result: Some(Value::Integer(0)),
            error: None,
        };
        let mut data = Vec::new();
        serde_cbor::to_writer(&mut data, &resp).unwrap();

        let tail = data.split_off(1);
        let chunks = VecDeque::from([
            Ok(data),
            Err(io::Error::new(io::ErrorKind::Interrupted, "spurious wakeup")),
            Ok(tail),
        ]);
        let connection = Connection::Replay { chunks };

        let device = Device::new(connection, crate::Network::Testnet);
        assert_eq!(device.ping().unwrap(), 0);
    }
}
