//! Websocket oracle: the live problem server transport.
//!
//! One JSON text frame per message, strict request/reply alternation
//! after the opening `{"User": …}` authentication. The only place the
//! dialog branches is the reply to a `Solution`: a score ends the
//! session, an `Instance` reuses the current repository, and a `Repo` is
//! followed by one more frame carrying the `Instance`.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use bix_protocol::{decode_server, encode_client, ClientMessage, Repo, ServerMessage};
use bix_types::{CommitId, Verdict};

use crate::error::{OracleError, OracleResult};
use crate::transport::{Oracle, Problem, Submission};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connection parameters for the problem server.
#[derive(Clone, Debug)]
pub struct ConnectConfig {
    /// Full websocket URL, e.g. `ws://host:1234/`.
    pub url: String,
    /// Authentication tokens sent as the opening `User` message.
    pub user: Vec<String>,
    /// Per-operation deadline. The server may think for a long time on
    /// large instances.
    pub timeout: Duration,
}

impl ConnectConfig {
    /// Config with the default 30-minute operation deadline.
    pub fn new(url: impl Into<String>, user: Vec<String>) -> Self {
        Self {
            url: url.into(),
            user,
            timeout: Duration::from_secs(30 * 60),
        }
    }
}

/// Oracle implementation over a persistent websocket.
pub struct WsOracle {
    stream: WsStream,
    user: Vec<String>,
    deadline: Duration,
    authenticated: bool,
    current_repo: Option<Repo>,
}

impl WsOracle {
    /// Dial the problem server.
    pub async fn connect(config: ConnectConfig) -> OracleResult<Self> {
        info!(url = %config.url, "connecting to problem server");
        let (stream, _) = timeout(config.timeout, connect_async(config.url.as_str()))
            .await
            .map_err(|_| OracleError::Timeout)??;
        info!("websocket handshake completed");
        Ok(Self {
            stream,
            user: config.user,
            deadline: config.timeout,
            authenticated: false,
            current_repo: None,
        })
    }

    async fn send(&mut self, msg: &ClientMessage) -> OracleResult<()> {
        let frame = encode_client(msg)?;
        timeout(self.deadline, self.stream.send(Message::Text(frame)))
            .await
            .map_err(|_| OracleError::Timeout)??;
        Ok(())
    }

    /// Read frames until one carries a protocol message.
    async fn next_message(&mut self) -> OracleResult<ServerMessage> {
        loop {
            let frame = timeout(self.deadline, self.stream.next())
                .await
                .map_err(|_| OracleError::Timeout)?;
            match frame {
                None => return Err(OracleError::ConnectionClosed),
                Some(Err(e)) => return Err(e.into()),
                Some(Ok(Message::Text(text))) => {
                    let msg = decode_server(&text)?;
                    debug!(kind = msg.type_name(), "received oracle message");
                    return Ok(msg);
                }
                Some(Ok(Message::Ping(payload))) => {
                    self.stream.send(Message::Pong(payload)).await?;
                }
                Some(Ok(Message::Pong(_))) => {}
                Some(Ok(Message::Close(_))) => return Err(OracleError::ConnectionClosed),
                Some(Ok(other)) => {
                    warn!(?other, "unexpected non-text frame from oracle");
                    return Err(OracleError::unexpected("a text frame", "a binary frame"));
                }
            }
        }
    }

    async fn expect_instance(&mut self) -> OracleResult<bix_protocol::Instance> {
        match self.next_message().await? {
            ServerMessage::Instance(instance) => Ok(instance),
            other => Err(OracleError::unexpected("Instance", other.type_name())),
        }
    }
}

#[async_trait]
impl Oracle for WsOracle {
    async fn fetch_instance(&mut self) -> OracleResult<Option<Problem>> {
        if self.authenticated {
            return Ok(None);
        }
        self.send(&ClientMessage::User(self.user.clone())).await?;
        self.authenticated = true;

        let repo = match self.next_message().await? {
            ServerMessage::Repo(repo) => repo,
            other => return Err(OracleError::unexpected("Repo", other.type_name())),
        };
        let instance = self.expect_instance().await?;
        info!(
            repo = %repo.name,
            commits = repo.dag.len(),
            instances = repo.instance_count,
            "received opening problem"
        );
        self.current_repo = Some(repo.clone());
        Ok(Some(Problem { repo, instance }))
    }

    async fn ask(&mut self, commit: &CommitId) -> OracleResult<Verdict> {
        self.send(&ClientMessage::Question(commit.clone())).await?;
        match self.next_message().await? {
            ServerMessage::Answer(verdict) => Ok(verdict),
            other => Err(OracleError::unexpected("Answer", other.type_name())),
        }
    }

    async fn submit(&mut self, solution: &CommitId) -> OracleResult<Submission> {
        self.send(&ClientMessage::Solution(solution.clone())).await?;
        match self.next_message().await? {
            ServerMessage::Score(score) => {
                info!(instances = score.len(), "session scored");
                Ok(Submission::Score(score))
            }
            ServerMessage::Instance(instance) => {
                let repo = self
                    .current_repo
                    .clone()
                    .ok_or(OracleError::NoActiveInstance)?;
                info!(repo = %repo.name, "received new instance on current repo");
                Ok(Submission::Next(Problem { repo, instance }))
            }
            ServerMessage::Repo(repo) => {
                let instance = self.expect_instance().await?;
                info!(repo = %repo.name, commits = repo.dag.len(), "received new repo");
                self.current_repo = Some(repo.clone());
                Ok(Submission::Next(Problem { repo, instance }))
            }
            other @ ServerMessage::Answer(_) => Err(OracleError::unexpected(
                "Score, Instance or Repo",
                other.type_name(),
            )),
        }
    }

    async fn close(&mut self) -> OracleResult<()> {
        if let Err(e) = self.stream.close(None).await {
            debug!(error = %e, "websocket close handshake failed");
        }
        Ok(())
    }
}
