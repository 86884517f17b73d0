use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use crate::batch::Batch;
use crate::config::{ColumnNaming, MartTarget};
use crate::error::{BamMartError, Result};
use crate::mart::query::{build_query_xml, parse_schema_listing, parse_tsv_response, rejection_message};
use crate::mart::{AnnotationService, ResultTable, Schema};

/// Path of the REST endpoint below the host
pub const MARTSERVICE_PATH: &str = "/biomart/martservice";

/// Large batches can take minutes to come back.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Blocking client for a BioMart `martservice` endpoint
pub struct BiomartClient {
    client: Client,
    target: MartTarget,
}

impl BiomartClient {
    pub fn new(target: MartTarget) -> Result<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(format!("bammart/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, target })
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.target.host.trim_end_matches('/'), MARTSERVICE_PATH)
    }

    fn fetch_listing(&self, kind: &str) -> Result<Vec<String>> {
        let url = self.endpoint();
        debug!("GET {} type={} dataset={}", url, kind, self.target.dataset);
        let response = self
            .client
            .get(&url)
            .query(&[("type", kind), ("dataset", self.target.dataset.as_str())])
            .send()?
            .error_for_status()?;
        let body = response.text()?;

        if let Some(message) = rejection_message(&body) {
            return Err(BamMartError::MalformedResponse(message));
        }
        Ok(parse_schema_listing(&body))
    }
}

impl AnnotationService for BiomartClient {
    fn query_batch(
        &self,
        filter: &str,
        batch: &Batch,
        attributes: &[String],
        naming: ColumnNaming,
    ) -> Result<ResultTable> {
        let xml = build_query_xml(
            &self.target.dataset,
            filter,
            &batch.ids,
            attributes,
            naming == ColumnNaming::Display,
        );
        debug!("Batch {} query: {} bytes of XML", batch.index, xml.len());

        let response = self
            .client
            .post(self.endpoint())
            .form(&[("query", xml.as_str())])
            .send()?;

        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            let snippet: String = body.chars().take(200).collect();
            return Err(BamMartError::QueryRejected {
                batch: batch.index,
                message: format!("HTTP {}: {}", status, snippet.trim()),
            });
        }
        if let Some(message) = rejection_message(&body) {
            return Err(BamMartError::QueryRejected {
                batch: batch.index,
                message,
            });
        }

        parse_tsv_response(&body, attributes, naming)
    }

    fn schema(&self) -> Result<Schema> {
        Ok(Schema {
            attributes: self.fetch_listing("attributes")?,
            filters: self.fetch_listing("filters")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Answer a single HTTP request with `status` and `body`, handing back
    /// the request line and body that were received
    fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<(String, String)>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let host = format!("http://{}", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
            }
            let mut request_body = vec![0u8; content_length];
            reader.read_exact(&mut request_body).unwrap();

            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            )
            .unwrap();
            stream.flush().unwrap();

            (request_line, String::from_utf8(request_body).unwrap())
        });

        (host, handle)
    }

    // local server must not be routed through an ambient HTTP_PROXY
    fn client_for(host: String) -> BiomartClient {
        BiomartClient {
            client: Client::builder().no_proxy().build().unwrap(),
            target: MartTarget {
                host,
                dataset: "hsapiens_gene_ensembl".to_string(),
            },
        }
    }

    fn batch(index: usize) -> Batch {
        Batch {
            index,
            ids: vec!["ENST00000456328".to_string(), "ENST00000450305".to_string()],
        }
    }

    fn attributes() -> Vec<String> {
        vec!["ensembl_transcript_id".to_string(), "transcript_biotype".to_string()]
    }

    #[test]
    fn test_endpoint_joins_host() {
        let client = BiomartClient::new(MartTarget {
            host: "https://useast.ensembl.org/".to_string(),
            dataset: "mmusculus_gene_ensembl".to_string(),
        })
        .unwrap();
        assert_eq!(client.endpoint(), "https://useast.ensembl.org/biomart/martservice");
    }

    #[test]
    fn test_query_batch_posts_xml_and_parses_rows() {
        let (host, server) = serve_once(
            "200 OK",
            "ENST00000456328\tlncRNA\nENST00000450305\ttranscribed_unprocessed_pseudogene\n",
        );
        let table = client_for(host)
            .query_batch("link_ensembl_transcript_stable_id", &batch(1), &attributes(), ColumnNaming::Attribute)
            .unwrap();

        assert_eq!(table.columns, attributes());
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].values, vec!["ENST00000456328", "lncRNA"]);

        let (request_line, request_body) = server.join().unwrap();
        assert!(request_line.starts_with("POST /biomart/martservice"));
        assert!(request_body.starts_with("query="));
        assert!(request_body.contains("ENST00000456328"));
    }

    #[test]
    fn test_query_error_body_is_rejection() {
        let (host, server) = serve_once(
            "200 OK",
            "Query ERROR: caught BioMart::Exception::Usage: Filter link_foo NOT FOUND\n",
        );
        let err = client_for(host)
            .query_batch("link_foo", &batch(3), &attributes(), ColumnNaming::Attribute)
            .unwrap_err();
        server.join().unwrap();

        match err {
            BamMartError::QueryRejected { batch, message } => {
                assert_eq!(batch, 3);
                assert!(message.contains("NOT FOUND"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_error_status_is_rejection() {
        let (host, server) = serve_once("500 Internal Server Error", "request too large");
        let err = client_for(host)
            .query_batch("link_ensembl_transcript_stable_id", &batch(2), &attributes(), ColumnNaming::Attribute)
            .unwrap_err();
        server.join().unwrap();

        match err {
            BamMartError::QueryRejected { batch, message } => {
                assert_eq!(batch, 2);
                assert!(message.contains("500"));
                assert!(message.contains("request too large"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
