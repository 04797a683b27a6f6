//! Shared test fixtures: sample feeds and a local feed server

use axum::extract::RawQuery;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::get;
use axum::Router;
use std::sync::{Arc, Mutex};

pub const SAMPLE_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <link href="http://arxiv.org/api/query?search_query%3Dcat%3Acs.CL" rel="self" type="application/atom+xml"/>
  <title type="html">ArXiv Query: search_query=cat:cs.CL&amp;id_list=&amp;start=0&amp;max_results=2</title>
  <id>http://arxiv.org/api/cHxbiOdZaP56ODnBPIenZhzg5f8</id>
  <updated>2023-02-04T00:00:00-05:00</updated>
  <opensearch:totalResults xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/">2</opensearch:totalResults>
  <opensearch:startIndex xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/">0</opensearch:startIndex>
  <opensearch:itemsPerPage xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/">2</opensearch:itemsPerPage>
  <entry>
    <id>http://arxiv.org/abs/2301.12345v2</id>
    <updated>2023-02-03T10:15:00Z</updated>
    <published>2023-01-29T18:00:00Z</published>
    <title>Attention Is Still All You Need:
      A Retrospective</title>
    <summary>  We revisit the transformer
architecture six years on.
    </summary>
    <author>
      <name>Jane Smith</name>
    </author>
    <author>
      <name>John Doe</name>
    </author>
    <link href="http://arxiv.org/abs/2301.12345v2" rel="alternate" type="text/html"/>
    <link title="pdf" href="http://arxiv.org/pdf/2301.12345v2" rel="related" type="application/pdf"/>
    <arxiv:primary_category xmlns:arxiv="http://arxiv.org/schemas/atom" term="cs.CL" scheme="http://arxiv.org/schemas/atom"/>
    <category term="cs.CL" scheme="http://arxiv.org/schemas/atom"/>
    <category term="cs.LG" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2302.00001v1</id>
    <updated>2023-02-01T08:00:00-05:00</updated>
    <published>2023-02-01T08:00:00-05:00</published>
    <title>Sparse Mixtures of Experts</title>
    <summary>Routing tokens to a few experts.</summary>
    <author>
      <name>Ada Lovelace</name>
    </author>
    <arxiv:comment xmlns:arxiv="http://arxiv.org/schemas/atom">12 pages</arxiv:comment>
    <link href="http://arxiv.org/abs/2302.00001v1" rel="alternate" type="text/html"/>
    <link title="pdf" href="http://arxiv.org/pdf/2302.00001v1" rel="related" type="application/pdf"/>
    <category term="cs.LG" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
</feed>
"#;

/// First entry carries an unparseable timestamp
pub const TWO_ENTRY_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <id>http://arxiv.org/abs/2302.00009v1</id>
    <updated>2023-02-01T08:00:00Z</updated>
    <published>last tuesday</published>
    <title>Broken Dates</title>
    <summary>Never stored.</summary>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2302.00002v3</id>
    <updated>2023-02-02T08:00:00Z</updated>
    <published>2023-02-01T08:00:00Z</published>
    <title>Well Formed</title>
    <summary>Stored.</summary>
    <author><name>Grace Hopper</name></author>
    <link href="http://arxiv.org/abs/2302.00002v3" rel="alternate" type="text/html"/>
    <category term="cs.AI" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
</feed>
"#;

/// A local HTTP server standing in for the arXiv API
pub struct FeedServer {
    pub base_url: String,
    queries: Arc<Mutex<Vec<String>>>,
    user_agents: Arc<Mutex<Vec<String>>>,
}

impl FeedServer {
    /// Serve `body` with `status` for every request to `/api/query`
    pub async fn start(status: StatusCode, body: &'static str) -> Self {
        let queries = Arc::new(Mutex::new(Vec::new()));
        let user_agents = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&queries);
        let agents = Arc::clone(&user_agents);

        let app = Router::new().route(
            "/api/query",
            get(move |headers: HeaderMap, RawQuery(query): RawQuery| {
                let recorded = Arc::clone(&recorded);
                let agents = Arc::clone(&agents);
                async move {
                    recorded.lock().unwrap().push(query.unwrap_or_default());
                    let agent = headers
                        .get(header::USER_AGENT)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    agents.lock().unwrap().push(agent);
                    (status, body)
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/api/query", addr),
            queries,
            user_agents,
        }
    }

    /// Raw query strings received so far
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    /// `User-Agent` header of each request, in arrival order
    pub fn user_agents(&self) -> Vec<String> {
        self.user_agents.lock().unwrap().clone()
    }
}
