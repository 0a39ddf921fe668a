use jtlrpc_core::envelope::{SESSION_INVALID, UNKNOWN_ERROR};
use jtlrpc_core::model::{Identity, Image};
use jtlrpc_core::transport::{ATTACHMENT_FIELD, ATTACHMENT_FILE_NAME};
use jtlrpc_core::{ClientError, ConnectorClient, ResponseFormat};
use scripted_transport::ScriptedTransport;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

mod scripted_transport;

struct Fixture {
    dir: TempDir,
    transport: ScriptedTransport,
    client: ConnectorClient<ScriptedTransport>,
}

async fn setup() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let transport = ScriptedTransport::new();
    transport.respond_session("s1");

    let mut client = ConnectorClient::with_transport("token", transport.clone())
        .with_response_format(ResponseFormat::Array);
    client.authenticate().await.unwrap();

    Fixture {
        dir,
        transport,
        client,
    }
}

fn image(dir: &Path, host: u64, file: &str, create: bool) -> Image {
    let path = dir.join(file);
    if create {
        fs::write(&path, b"\x89PNG fake image").unwrap();
    }
    Image::new(
        Identity::new("", host),
        "product",
        path.to_string_lossy().into_owned(),
    )
}

#[tokio::test]
async fn test_push_images_bundles_existing_files() {
    let Fixture {
        dir,
        transport,
        mut client,
    } = setup().await;
    transport.respond_result(json!([]));

    let missing = image(dir.path(), 77, "testimage2.png", false);
    let missing_filename = missing.filename.clone();
    let mut images = vec![
        image(dir.path(), 42, "testimage1.jpg", true),
        missing,
        image(dir.path(), 123, "testimage3.jpg", true),
    ];

    client.push("image", &mut images).await.unwrap();

    let request = transport.requests().pop().unwrap();
    let attachment = request.attachment.as_ref().expect("image push is multipart");

    assert_eq!(request.envelope["method"], "image.push");
    assert_eq!(attachment.field, ATTACHMENT_FIELD);
    assert_eq!(attachment.file_name, ATTACHMENT_FILE_NAME);
    assert!(request.attachment_existed);
    assert_eq!(request.field_names, ["jtlauth", "jtlrpc"]);
    assert_eq!(
        request.archive_entries,
        ["42_product_testimage1.jpg", "123_product_testimage3.jpg"]
    );

    assert_eq!(images[0].filename, "42_product_testimage1.jpg");
    assert_eq!(images[1].filename, missing_filename);
    assert_eq!(images[2].filename, "123_product_testimage3.jpg");

    // The envelope carries the rewritten names.
    assert_eq!(
        request.envelope["params"][0]["filename"],
        "42_product_testimage1.jpg"
    );
    assert_eq!(request.envelope["params"][1]["filename"], missing_filename);

    assert!(!attachment.path.exists());
}

#[tokio::test]
async fn test_archive_removed_on_error() {
    let Fixture {
        dir,
        transport,
        mut client,
    } = setup().await;
    transport.respond_error(UNKNOWN_ERROR, "Image could not be saved");

    let mut images = vec![image(dir.path(), 1, "a.jpg", true)];

    let err = client.push("image", &mut images).await.unwrap_err();
    assert!(matches!(err, ClientError::Response { .. }));

    let request = transport.requests().pop().unwrap();
    let attachment = request.attachment.unwrap();
    assert!(request.attachment_existed);
    assert!(!attachment.path.exists());
}

#[tokio::test]
async fn test_archive_removed_on_transport_failure() {
    let Fixture {
        dir,
        transport,
        mut client,
    } = setup().await;
    transport.fail("connection reset by peer");

    let mut images = vec![image(dir.path(), 1, "a.jpg", true)];

    let err = client.push("image", &mut images).await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));

    let attachment = transport.requests().pop().unwrap().attachment.unwrap();
    assert!(!attachment.path.exists());
}

#[tokio::test]
async fn test_archive_survives_session_retry() {
    let Fixture {
        dir,
        transport,
        mut client,
    } = setup().await;
    transport
        .respond_error(SESSION_INVALID, "Session is invalid")
        .respond_session("s2")
        .respond_result(json!([]));

    let mut images = vec![image(dir.path(), 9, "b.png", true)];

    client.push("image", &mut images).await.unwrap();

    let requests = transport.requests();
    assert_eq!(
        transport.methods(),
        [
            "core.connector.auth",
            "image.push",
            "core.connector.auth",
            "image.push"
        ]
    );

    for request in [&requests[1], &requests[3]] {
        assert!(request.attachment_existed);
        assert_eq!(request.archive_entries, ["9_product_b.png"]);
    }
    assert_eq!(requests[3].session_id.as_deref(), Some("s2"));
    assert!(requests[2].attachment.is_none());

    assert!(!requests[3].attachment.as_ref().unwrap().path.exists());
}

#[tokio::test]
async fn test_pulled_images_can_be_pushed_back() {
    let Fixture {
        dir,
        transport,
        mut client,
    } = setup().await;
    let path = dir.path().join("front.jpg");
    fs::write(&path, b"jpeg").unwrap();

    transport
        .respond_result(json!([
            { "id": ["", 5], "relationType": "category", "filename": path.to_string_lossy() }
        ]))
        .respond_result(json!([]));

    client.set_response_format("object").unwrap();
    let mut models = client.pull("image", 1).await.unwrap();
    let jtlrpc_core::ControllerResponse::Models(images) = &mut models else {
        panic!("object format yields models");
    };

    client.push("image", images).await.unwrap();

    let request = transport.requests().pop().unwrap();
    assert_eq!(request.archive_entries, ["5_category_front.jpg"]);
    assert_eq!(request.envelope["params"][0]["filename"], "5_category_front.jpg");
}

#[tokio::test]
async fn test_raw_json_images_are_bundled() {
    let Fixture {
        dir,
        transport,
        mut client,
    } = setup().await;
    transport.respond_result(json!([]));

    let path = dir.path().join("x.jpg");
    fs::write(&path, b"jpeg").unwrap();
    let missing = dir.path().join("gone.jpg").to_string_lossy().into_owned();

    let mut images = vec![
        json!({ "id": ["", 7], "relationType": "product", "filename": path.to_string_lossy() }),
        json!({ "id": ["", 8], "relationType": "product", "filename": &missing }),
    ];

    client.push("image", &mut images).await.unwrap();

    let request = transport.requests().pop().unwrap();
    assert_eq!(request.archive_entries, ["7_product_x.jpg"]);
    assert_eq!(images[0]["filename"], "7_product_x.jpg");
    assert_eq!(images[1]["filename"], missing.as_str());
    assert_eq!(request.envelope["params"][0]["filename"], "7_product_x.jpg");
}

#[tokio::test]
async fn test_images_sharing_an_archive_name() {
    let Fixture {
        dir,
        transport,
        mut client,
    } = setup().await;
    transport.respond_result(json!([]));

    let nested = dir.path().join("nested");
    fs::create_dir(&nested).unwrap();
    let mut images = vec![
        image(dir.path(), 5, "front.jpg", true),
        image(&nested, 5, "front.jpg", true),
    ];

    client.push("image", &mut images).await.unwrap();

    let request = transport.requests().pop().unwrap();
    assert_eq!(request.archive_entries, ["5_product_front.jpg"]);
    assert_eq!(images[0].filename, "5_product_front.jpg");
    assert_eq!(images[1].filename, "5_product_front.jpg");
}

#[tokio::test]
async fn test_other_controllers_are_not_bundled() {
    let Fixture {
        dir,
        transport,
        mut client,
    } = setup().await;
    transport.respond_result(json!([]));

    let original = image(dir.path(), 3, "c.jpg", true);
    let mut images = vec![original.clone()];

    client.push("product_image", &mut images).await.unwrap();

    let request = transport.requests().pop().unwrap();
    assert!(request.attachment.is_none());
    assert_eq!(images[0], original);
}
