//! Full CRUD lifecycle test against the live users server.
//!
//! # Design
//! Starts the server on a random port, then exercises every core client
//! operation over real HTTP using ureq. Validates that the core's request
//! building and response parsing agree with the actual server.

use users_core::{
    ClientError, HttpMethod, HttpResponse, ListUsersParams, NewUser, User, UserPatch, UsersClient,
};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data, letting the core client interpret them.
fn execute(req: users_core::HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let content_type = req.header("content-type").unwrap_or("application/json").to_string();
    let mut response = match (req.method, req.body) {
        (HttpMethod::Get, _) => agent.get(&req.path).call(),
        (HttpMethod::Delete, _) => agent.delete(&req.path).call(),
        (HttpMethod::Post, Some(body)) => {
            agent.post(&req.path).content_type(&content_type).send(body.as_bytes())
        }
        (HttpMethod::Post, None) => agent.post(&req.path).send_empty(),
        (HttpMethod::Put, Some(body)) => {
            agent.put(&req.path).content_type(&content_type).send(body.as_bytes())
        }
        (HttpMethod::Put, None) => agent.put(&req.path).send_empty(),
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse {
        status,
        headers: Vec::new(),
        body,
    }
}

fn start_server() -> UsersClient {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            users_server::run(listener).await
        })
        .unwrap();
    });

    UsersClient::new(&format!("http://{addr}"))
}

fn new_user(first_name: &str, last_name: &str, age: i64) -> NewUser {
    NewUser {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        company_name: "ABC Corp".to_string(),
        age,
        city: "NYC".to_string(),
        state: "NY".to_string(),
        zip: 10001,
        email: format!("{}@example.com", first_name.to_lowercase()),
        web: "http://abc.com".to_string(),
    }
}

fn list(client: &UsersClient, params: ListUsersParams) -> Vec<User> {
    let req = client.build_list_users(&params);
    client.parse_list_users(execute(req)).unwrap()
}

#[test]
fn crud_lifecycle() {
    let client = start_server();

    // Step 1: list, should be empty.
    let users = list(&client, ListUsersParams::default());
    assert!(users.is_empty(), "expected empty list");

    // Step 2: create the three fixture users.
    let mut created = Vec::new();
    for (first, last, age) in [("James", "Smith", 35), ("Emily", "Jameson", 28), ("Mike", "Johnson", 42)] {
        let req = client.build_create_user(&new_user(first, last, age)).unwrap();
        created.push(client.parse_create_user(execute(req)).unwrap());
    }
    assert_eq!(created.iter().map(|u| u.id).collect::<Vec<_>>(), vec![1, 2, 3]);

    // Step 3: filtered, sorted, paginated list.
    let users = list(
        &client,
        ListUsersParams {
            page: Some(1),
            limit: Some(1),
            name: Some("james".to_string()),
            sort: Some("-age".to_string()),
        },
    );
    assert_eq!(users, vec![created[0].clone()]);

    // Step 4: unknown sort field is a bad request.
    let req = client.build_list_users(&ListUsersParams {
        sort: Some("password".to_string()),
        ..ListUsersParams::default()
    });
    let err = client.parse_list_users(execute(req)).unwrap_err();
    assert!(matches!(err, ClientError::BadRequest(_)), "{err:?}");

    // Step 5: get one user.
    let req = client.build_get_user(2);
    let fetched = client.parse_get_user(execute(req)).unwrap();
    assert_eq!(fetched, created[1]);

    // Step 6: partial update.
    let patch = UserPatch {
        city: Some("Boston".to_string()),
        ..UserPatch::default()
    };
    let req = client.build_update_user(2, &patch).unwrap();
    let updated = client.parse_update_user(execute(req)).unwrap();
    assert_eq!(updated.city, "Boston");
    assert_eq!(updated.last_name, "Jameson");

    // Step 7: invalid update surfaces field errors.
    let patch = UserPatch {
        first_name: Some("   ".to_string()),
        ..UserPatch::default()
    };
    let req = client.build_update_user(2, &patch).unwrap();
    let err = client.parse_update_user(execute(req)).unwrap_err();
    let ClientError::Validation(fields) = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert!(fields.contains_key("first_name"));

    // Step 8: delete.
    let req = client.build_delete_user(2);
    let message = client.parse_delete_user(execute(req)).unwrap();
    assert_eq!(message, "User deleted");

    // Step 9: get after delete, should be NotFound.
    let req = client.build_get_user(2);
    let err = client.parse_get_user(execute(req)).unwrap_err();
    assert!(matches!(err, ClientError::NotFound));

    // Step 10: delete again, should be NotFound.
    let req = client.build_delete_user(2);
    let err = client.parse_delete_user(execute(req)).unwrap_err();
    assert!(matches!(err, ClientError::NotFound));

    // Step 11: list sorted by age ascending skips the deleted user.
    let users = list(
        &client,
        ListUsersParams {
            sort: Some("age".to_string()),
            ..ListUsersParams::default()
        },
    );
    let ages: Vec<i64> = users.iter().map(|u| u.age).collect();
    assert_eq!(ages, vec![35, 42]);
}
