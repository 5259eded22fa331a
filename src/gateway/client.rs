use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::gateway::error::{GatewayError, GatewayResult};
use crate::gateway::session::Session;
use crate::gateway::source::{
    MatchSource, ScoreSink, ScoreUpdate, Snapshot, StatusSource, TournamentSource,
};
use crate::models::{
    GameMatch, MatchId, ScorerSession, ScorerStatus, Standings, Tournament, TournamentId,
};

const USER_AGENT: &str = "DartTournamentLive/0.1";
const SCORER_TOKEN_HEADER: &str = "X-Scorer-Token";

/// Thin authenticated client for the tournament REST API.
#[derive(Clone)]
pub struct Gateway {
    client: Client,
    base_url: Arc<str>,
    session: Arc<Session>,
}

#[derive(Serialize)]
struct PairRequest<'a> {
    code: &'a str,
}

impl Gateway {
    /// Build a client for `base_url` (e.g. `http://host/api`) bound to `session`.
    pub fn new(base_url: &str, session: Arc<Session>, timeout: Duration) -> GatewayResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|source| GatewayError::ClientBuilder { source })?;
        Ok(Self {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
            session,
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// `GET /tournaments/public/{uuid}`: tournament with embedded matches.
    pub async fn public_tournament(&self, public_uuid: Uuid) -> GatewayResult<Tournament> {
        let path = format!("tournaments/public/{}", public_uuid);
        self.send(self.request(Method::GET, &path), &path).await
    }

    /// `GET /tournaments/{id}/standings`.
    pub async fn standings(&self, tournament_id: TournamentId) -> GatewayResult<Standings> {
        let path = format!("tournaments/{}/standings", tournament_id);
        self.send(self.request(Method::GET, &path), &path).await
    }

    /// `GET /matches/{id}`.
    pub async fn match_detail(&self, match_id: MatchId) -> GatewayResult<GameMatch> {
        let path = format!("matches/{}", match_id);
        self.send(self.request(Method::GET, &path), &path).await
    }

    /// `PUT /matches/{id}/score`. Returns the match as stored by the server.
    pub async fn submit_score(
        &self,
        match_id: MatchId,
        update: &ScoreUpdate,
    ) -> GatewayResult<GameMatch> {
        let path = format!("matches/{}/score", match_id);
        let mut builder = self.request(Method::PUT, &path).json(update);
        if let Some(token) = self.session.scorer_token() {
            builder = builder.header(SCORER_TOKEN_HEADER, token);
        }
        log::debug!(
            "Submitting {}-{} (completed: {}) for match {}",
            update.score_p1,
            update.score_p2,
            update.is_completed,
            match_id
        );
        self.send(builder, &path).await
    }

    /// `GET /scorer/status/{tournament}/{board}`.
    pub async fn scorer_status(&self, scorer: ScorerSession) -> GatewayResult<ScorerStatus> {
        let path = format!(
            "scorer/status/{}/{}",
            scorer.tournament_id, scorer.board_number
        );
        self.send(self.request(Method::GET, &path), &path).await
    }

    /// `POST /scorer/auth`: exchange a short pairing code for a board. Stores the pairing in the
    /// session on success.
    pub async fn pair_scorer(&self, code: &str) -> GatewayResult<ScorerStatus> {
        let path = "scorer/auth";
        let builder = self
            .request(Method::POST, path)
            .json(&PairRequest { code: code.trim() });
        let status: ScorerStatus = self.send(builder, path).await?;
        if let Err(e) = self.session.pair(status.session()) {
            log::warn!("Paired, but failed to persist the pairing: {}", e);
        }
        Ok(status)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        let builder = self.client.request(method, url);
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T>(&self, builder: RequestBuilder, path: &str) -> GatewayResult<T>
    where
        T: DeserializeOwned,
    {
        let had_token = self.session.token().is_some();
        let response = builder
            .send()
            .await
            .map_err(|source| GatewayError::Transport {
                path: path.to_string(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(|source| GatewayError::Decode {
                path: path.to_string(),
                source,
            });
        }

        if status == StatusCode::UNAUTHORIZED && had_token {
            log::warn!("Token rejected by {}, clearing session", path);
            self.session.expire_token();
            return Err(GatewayError::Unauthorized);
        }

        // Body is best effort: the status alone is enough to report the failure.
        let body = response.text().await.unwrap_or_default();
        Err(GatewayError::rejected(status, &body))
    }
}

/// Polls the public endpoint of one tournament, then its standings.
#[derive(Clone)]
pub struct PublicTournamentSource {
    gateway: Gateway,
    public_uuid: Uuid,
}

impl PublicTournamentSource {
    pub fn new(gateway: Gateway, public_uuid: Uuid) -> Self {
        Self {
            gateway,
            public_uuid,
        }
    }
}

impl TournamentSource for PublicTournamentSource {
    fn fetch_snapshot(&self) -> BoxFuture<'static, GatewayResult<Snapshot>> {
        let gateway = self.gateway.clone();
        let public_uuid = self.public_uuid;
        async move {
            let tournament = gateway.public_tournament(public_uuid).await?;
            let standings = gateway.standings(tournament.id).await?;
            Ok(Snapshot::new(tournament, standings))
        }
        .boxed()
    }
}

impl MatchSource for Gateway {
    fn match_detail(&self, match_id: MatchId) -> BoxFuture<'static, GatewayResult<GameMatch>> {
        let gateway = self.clone();
        async move { gateway.match_detail(match_id).await }.boxed()
    }
}

impl ScoreSink for Gateway {
    fn submit_score(
        &self,
        match_id: MatchId,
        update: ScoreUpdate,
    ) -> BoxFuture<'static, GatewayResult<GameMatch>> {
        let gateway = self.clone();
        async move { gateway.submit_score(match_id, &update).await }.boxed()
    }
}

impl StatusSource for Gateway {
    fn scorer_status(
        &self,
        scorer: ScorerSession,
    ) -> BoxFuture<'static, GatewayResult<ScorerStatus>> {
        let gateway = self.clone();
        async move { gateway.scorer_status(scorer).await }.boxed()
    }
}
