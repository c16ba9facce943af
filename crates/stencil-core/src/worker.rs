use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use crate::error::WorkerError;
use crate::parse::Schema;
use crate::render::{RenderOutput, process, render};
use crate::selector::Selector;
use crate::template::Template;

/// Work posted to the render thread.
#[derive(Debug, Clone)]
pub enum WorkerRequest {
    /// Filter `schema` with `selector`, then render.
    Process {
        schema: Schema,
        selector: Selector,
        template: Template,
    },
    /// Render `schema` as-is.
    Update { schema: Schema, template: Template },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerResponse {
    Processed(RenderOutput),
}

impl WorkerResponse {
    pub fn into_output(self) -> RenderOutput {
        match self {
            WorkerResponse::Processed(output) => output,
        }
    }
}

fn handle_request(request: WorkerRequest) -> WorkerResponse {
    let output = match request {
        WorkerRequest::Process {
            schema,
            selector,
            template,
        } => process(&schema, &selector, &template),
        WorkerRequest::Update { schema, template } => render(&schema, &template),
    };
    WorkerResponse::Processed(output)
}

/// A dedicated thread that filters and renders off the caller's thread.
///
/// Each request produces exactly one response, in order. There is no
/// queue management: callers send one request and wait for its answer.
pub struct Worker {
    requests: Option<Sender<WorkerRequest>>,
    responses: Receiver<WorkerResponse>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    pub fn spawn() -> Self {
        let (request_tx, request_rx) = mpsc::channel::<WorkerRequest>();
        let (response_tx, response_rx) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("stencil-render".to_string())
            .spawn(move || {
                for request in request_rx {
                    if response_tx.send(handle_request(request)).is_err() {
                        break;
                    }
                }
                log::debug!("render worker exiting");
            })
            .ok();

        if handle.is_none() {
            log::warn!("failed to spawn render worker thread");
        }

        Self {
            requests: Some(request_tx),
            responses: response_rx,
            handle,
        }
    }

    pub fn submit(&self, request: WorkerRequest) -> Result<(), WorkerError> {
        self.requests
            .as_ref()
            .ok_or(WorkerError::Disconnected)?
            .send(request)
            .map_err(|_| WorkerError::Disconnected)
    }

    /// Block until the next response arrives.
    pub fn recv(&self) -> Result<WorkerResponse, WorkerError> {
        self.responses.recv().map_err(|_| WorkerError::Disconnected)
    }

    /// Submit and wait for the matching response.
    pub fn request(&self, request: WorkerRequest) -> Result<RenderOutput, WorkerError> {
        self.submit(request)?;
        self.recv().map(WorkerResponse::into_output)
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        // Closing the sender ends the thread's receive loop.
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn schema() -> Schema {
        parse::from_json(
            r#"{"paths": {
                "/a": {"get": {"summary": "s", "operationId": "opA", "tags": ["t1"]}},
                "/b/{id}": {"delete": {"summary": "d", "operationId": "opB", "tags": ["t2"]}}
            }}"#,
        )
        .unwrap()
    }

    fn template() -> Template {
        Template {
            code: "$apiOperationId$ $apiPath$".to_string(),
            ..Template::new("w", "worker")
        }
    }

    #[test]
    fn test_process_request() {
        let worker = Worker::spawn();
        let output = worker
            .request(WorkerRequest::Process {
                schema: schema(),
                selector: Selector::parse("t2"),
                template: template(),
            })
            .unwrap();
        assert_eq!(output.codes, vec!["opB /b/${params.id}".to_string()]);
        assert_eq!(output.totals, 1);
    }

    #[test]
    fn test_update_request_renders_everything() {
        let worker = Worker::spawn();
        let output = worker
            .request(WorkerRequest::Update {
                schema: schema(),
                template: template(),
            })
            .unwrap();
        assert_eq!(output.totals, 2);
    }

    #[test]
    fn test_responses_arrive_in_order() {
        let worker = Worker::spawn();
        worker
            .submit(WorkerRequest::Process {
                schema: schema(),
                selector: Selector::parse("t1"),
                template: template(),
            })
            .unwrap();
        worker
            .submit(WorkerRequest::Update {
                schema: Schema::default(),
                template: template(),
            })
            .unwrap();

        assert_eq!(worker.recv().unwrap().into_output().totals, 1);
        assert_eq!(worker.recv().unwrap().into_output(), RenderOutput::default());
    }
}
