//! Off-thread computation of guess recommendations.
//!
//! The interactive side never blocks on the recommendation engine directly. It sends tagged
//! [SolverReq] messages to a single computation thread and consumes [SolverResp] messages coming
//! back. Requests carry a monotonically increasing id; only the response matching the latest
//! issued id is authoritative, and everything older is discarded as stale. That is the whole
//! cancellation story: superseding a computation with a newer request abandons the old one, and
//! its response may still arrive at any time, in any order.

use super::data::DATA;
use super::history;
use super::prelude::*;
use super::solver::{best_next_guess, RecommendOptions, SolverErr};
use instant::Instant;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::JoinHandle;

pub type RequestId = u64;

/// Requests accepted by the computation thread.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum SolverReq {
    /// Recommend the best next guess for the given candidate set.
    Compute {
        request_id: RequestId,
        candidates: Vec<String>,
        /// De-weighting applied to known past answers; None scores uniformly.
        past_answer_weight: Option<WordleFloat>,
    },
    /// Liveness probe; carries no id and is exempt from staleness checks.
    Ping,
}

/// Responses produced by the computation thread.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum SolverResp {
    Result {
        request_id: RequestId,
        guess: String,
        score: WordleFloat,
        took_ms: WordleFloat,
    },
    Error {
        request_id: RequestId,
        message: String,
    },
    Pong,
}

impl SolverResp {
    /// The id of the request this response answers; None for [SolverResp::Pong].
    pub fn request_id(&self) -> Option<RequestId> {
        match self {
            SolverResp::Result { request_id, .. } | SolverResp::Error { request_id, .. } => {
                Some(*request_id)
            }
            SolverResp::Pong => None,
        }
    }
}

///
/// True when `resp` answers a request that has since been superseded. Computation durations vary
/// wildly (the shortlist path vs the close-to-finish path), so responses can complete out of
/// order; comparing against the latest issued id is the only ordering guarantee the protocol
/// needs. Pong is never stale.
///
pub fn is_stale_response(resp: &SolverResp, latest_request_id: RequestId) -> bool {
    match resp.request_id() {
        Some(id) => id != latest_request_id,
        None => false,
    }
}

///
/// The computation side of the protocol: owns the guess universe and the known-past-answer set,
/// and turns one request into one response. Purely synchronous; [SolverChannel] runs it on its
/// own thread.
///
pub struct SolverAgent {
    allowed_guesses: Vec<String>,
    past_answers: HashSet<String>,
}

impl SolverAgent {
    pub fn new(allowed_guesses: Vec<String>, past_answers: HashSet<String>) -> Self {
        Self {
            allowed_guesses,
            past_answers,
        }
    }

    /// Agent over the embedded word lists, with past answers as known at `now_unix_ms`.
    pub fn from_embedded_data(now_unix_ms: i64) -> Self {
        Self::new(
            DATA.allowed_guesses.clone(),
            history::known_past_answers(&DATA.answers_by_date, now_unix_ms),
        )
    }

    pub fn handle(&self, req: SolverReq) -> SolverResp {
        match req {
            SolverReq::Ping => SolverResp::Pong,
            SolverReq::Compute {
                request_id,
                candidates,
                past_answer_weight,
            } => {
                log::debug!(
                    "compute request {} over {} candidates",
                    request_id,
                    candidates.len()
                );

                let start_at = Instant::now();
                let out = self.compute(&candidates, past_answer_weight);
                let took_ms = start_at.elapsed().as_secs_f64() * 1000.0;

                match out {
                    Ok((guess, score)) => SolverResp::Result {
                        request_id,
                        guess,
                        score,
                        took_ms,
                    },
                    // a failed computation answers with the same id, so the interactive side can
                    // tell whether the failure is still relevant
                    Err(err) => SolverResp::Error {
                        request_id,
                        message: err.to_string(),
                    },
                }
            }
        }
    }

    fn compute(
        &self,
        candidates: &[String],
        past_answer_weight: Option<WordleFloat>,
    ) -> Result<(String, WordleFloat), SolverErr> {
        let candidates: Vec<&str> = candidates.iter().map(|s| s.as_str()).collect();
        let allowed: Vec<&str> = self.allowed_guesses.iter().map(|s| s.as_str()).collect();

        let weights = past_answer_weight
            .map(|w| history::build_past_answer_weights(&candidates, &self.past_answers, w));

        let mut opts = RecommendOptions::new(&candidates, &allowed);
        if let Some(ws) = &weights {
            opts = opts.with_weights(ws);
        }

        let rec = best_next_guess(&opts)?;
        Ok((rec.word.to_string(), rec.score))
    }
}

///
/// Interactive-side handle: spawns the computation thread and exchanges messages with it. One
/// request is processed at a time, to completion; issuing a new request while one is in flight
/// simply supersedes it. The thread exits when the handle is dropped.
///
pub struct SolverChannel {
    req_tx: Sender<SolverReq>,
    resp_rx: Receiver<SolverResp>,
    latest_request_id: RequestId,
    worker: Option<JoinHandle<()>>,
}

impl SolverChannel {
    pub fn spawn(agent: SolverAgent) -> std::io::Result<Self> {
        let (req_tx, req_rx) = channel::<SolverReq>();
        let (resp_tx, resp_rx) = channel::<SolverResp>();

        let worker = std::thread::Builder::new()
            .name("wordle-solver".to_string())
            .spawn(move || {
                while let Ok(req) = req_rx.recv() {
                    // send fails only when the interactive side is gone, which also ends us
                    if resp_tx.send(agent.handle(req)).is_err() {
                        break;
                    }
                }
                log::debug!("solver thread shutting down");
            })?;

        Ok(Self {
            req_tx,
            resp_rx,
            latest_request_id: 0,
            worker: Some(worker),
        })
    }

    /// Issues a compute request tagged with the next id, superseding any in-flight request.
    pub fn request_compute(
        &mut self,
        candidates: Vec<String>,
        past_answer_weight: Option<WordleFloat>,
    ) -> RequestId {
        self.latest_request_id += 1;
        let request_id = self.latest_request_id;
        self.send(SolverReq::Compute {
            request_id,
            candidates,
            past_answer_weight,
        });
        request_id
    }

    /// Liveness probe; answered with [SolverResp::Pong] after any in-flight computation finishes.
    pub fn ping(&self) {
        self.send(SolverReq::Ping);
    }

    pub fn latest_request_id(&self) -> RequestId {
        self.latest_request_id
    }

    ///
    /// Non-blocking poll for an authoritative response. Drains everything currently queued,
    /// discarding stale responses, and returns the newest authoritative one (if any).
    ///
    pub fn try_recv(&mut self) -> Option<SolverResp> {
        let mut latest = None;
        while let Ok(resp) = self.resp_rx.try_recv() {
            if let Some(resp) = self.accept(resp) {
                latest = Some(resp);
            }
        }
        latest
    }

    ///
    /// Blocks until an authoritative response arrives (skipping over stale ones), or returns None
    /// if the computation thread is gone.
    ///
    pub fn recv(&self) -> Option<SolverResp> {
        while let Ok(resp) = self.resp_rx.recv() {
            if let Some(resp) = self.accept(resp) {
                return Some(resp);
            }
        }
        None
    }

    fn accept(&self, resp: SolverResp) -> Option<SolverResp> {
        if is_stale_response(&resp, self.latest_request_id) {
            log::debug!(
                "discarding stale response for request {:?} (latest is {})",
                resp.request_id(),
                self.latest_request_id,
            );
            None
        } else {
            Some(resp)
        }
    }

    fn send(&self, req: SolverReq) {
        if self.req_tx.send(req).is_err() {
            log::warn!("solver thread is gone; request dropped");
        }
    }
}

impl Drop for SolverChannel {
    fn drop(&mut self) {
        // closing the request sender ends the worker loop
        let (tx, _rx) = channel();
        self.req_tx = tx;
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_resp(request_id: RequestId) -> SolverResp {
        SolverResp::Result {
            request_id,
            guess: "slate".to_string(),
            score: 5.0,
            took_ms: 12.0,
        }
    }

    #[test]
    fn test_stale_discrimination_out_of_order() {
        // requests 1, 2, 3 issued; responses arrive 1, 3, 2 — only 3 is authoritative,
        // and 2 stays stale even though it arrived after 3
        let latest = 3;
        let arrivals = [make_resp(1), make_resp(3), make_resp(2)];
        let accepted: Vec<RequestId> = arrivals
            .iter()
            .filter(|r| !is_stale_response(r, latest))
            .filter_map(|r| r.request_id())
            .collect();
        assert_eq!(accepted, vec![3]);
    }

    #[test]
    fn test_errors_subject_to_same_staleness_rule() {
        let err = SolverResp::Error {
            request_id: 2,
            message: "whatever".to_string(),
        };
        assert!(is_stale_response(&err, 3));
        assert!(!is_stale_response(&err, 2));
    }

    #[test]
    fn test_pong_is_never_stale() {
        assert!(!is_stale_response(&SolverResp::Pong, 0));
        assert!(!is_stale_response(&SolverResp::Pong, 41));
    }

    fn test_agent() -> SolverAgent {
        let words = ["cigar", "rebut", "mooch", "slate", "crane"];
        SolverAgent::new(
            words.iter().map(|s| s.to_string()).collect(),
            std::iter::once("cigar".to_string()).collect(),
        )
    }

    #[test]
    fn test_agent_answers_ping() {
        assert_eq!(test_agent().handle(SolverReq::Ping), SolverResp::Pong);
    }

    #[test]
    fn test_agent_computes_result_with_matching_id() {
        let resp = test_agent().handle(SolverReq::Compute {
            request_id: 7,
            candidates: vec!["cigar".to_string(), "rebut".to_string()],
            past_answer_weight: None,
        });
        match resp {
            SolverResp::Result {
                request_id,
                guess,
                score,
                took_ms,
            } => {
                assert_eq!(request_id, 7);
                assert!(["cigar", "rebut"].contains(&guess.as_str()));
                assert!(score.is_finite());
                assert!(took_ms >= 0.0);
            }
            other => panic!("expected result, got {:?}", other),
        }
    }

    #[test]
    fn test_agent_single_candidate_solved_sentinel() {
        let resp = test_agent().handle(SolverReq::Compute {
            request_id: 1,
            candidates: vec!["mooch".to_string()],
            past_answer_weight: None,
        });
        match resp {
            SolverResp::Result { guess, score, .. } => {
                assert_eq!(guess, "mooch");
                assert!(score.is_infinite());
            }
            other => panic!("expected result, got {:?}", other),
        }
    }

    #[test]
    fn test_agent_reports_error_with_request_id() {
        let resp = test_agent().handle(SolverReq::Compute {
            request_id: 9,
            candidates: vec![],
            past_answer_weight: None,
        });
        match resp {
            SolverResp::Error {
                request_id,
                message,
            } => {
                assert_eq!(request_id, 9);
                assert!(!message.is_empty());
            }
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_channel_round_trip() {
        let mut channel = SolverChannel::spawn(test_agent()).unwrap();
        let id = channel.request_compute(
            vec!["cigar".to_string(), "rebut".to_string()],
            Some(history::DEFAULT_PAST_ANSWER_WEIGHT),
        );
        match channel.recv() {
            Some(SolverResp::Result { request_id, .. }) => assert_eq!(request_id, id),
            other => panic!("expected result, got {:?}", other),
        }
    }

    #[test]
    fn test_channel_supersede_discards_older_response() {
        let mut channel = SolverChannel::spawn(test_agent()).unwrap();
        let candidates = vec!["cigar".to_string(), "rebut".to_string(), "slate".to_string()];
        channel.request_compute(candidates.clone(), None);
        let latest = channel.request_compute(candidates, None);
        // the worker answers both in order; the first response must be skipped as stale
        match channel.recv() {
            Some(SolverResp::Result { request_id, .. }) => assert_eq!(request_id, latest),
            other => panic!("expected result, got {:?}", other),
        }
    }

    #[test]
    fn test_try_recv_drains_and_skips_stale() {
        let mut channel = SolverChannel::spawn(test_agent()).unwrap();
        let candidates = vec!["cigar".to_string(), "rebut".to_string(), "slate".to_string()];
        channel.request_compute(candidates.clone(), None);
        let latest = channel.request_compute(candidates, None);

        // responses land in issue order; polling must only ever surface the authoritative one,
        // whether the drain sees the superseded response in the same pass or an earlier one
        let resp = loop {
            if let Some(resp) = channel.try_recv() {
                break resp;
            }
            std::thread::sleep(std::time::Duration::from_millis(1));
        };
        match resp {
            SolverResp::Result { request_id, .. } => assert_eq!(request_id, latest),
            other => panic!("expected result, got {:?}", other),
        }

        // nothing left queued once the authoritative response is out
        assert!(channel.try_recv().is_none());
    }

    #[test]
    fn test_channel_ping_pong() {
        let channel = SolverChannel::spawn(test_agent()).unwrap();
        channel.ping();
        assert_eq!(channel.recv(), Some(SolverResp::Pong));
    }
}
