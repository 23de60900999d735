//! File CRUD tests
//!
//! Every lookup is scoped by owner: another user's file behaves like a missing one.

mod common;

use chat_toolkit::infrastructure::entities::{File, Pagination, UpdateFile};
use chat_toolkit::infrastructure::traits::FileRepository;
use common::{repositories, seed_conversation, setup_test_db};

const USER: &str = "user-1";
const OTHER_USER: &str = "user-2";

#[tokio::test]
async fn test_create_file() {
    let pool = setup_test_db().await;
    let repos = repositories(&pool);
    seed_conversation(&repos, "1", USER).await;

    let file_data = File::new(USER, "1", "test.txt", "/tmp/test.txt", 100);
    let file = repos.files.create_file(file_data.clone()).await.unwrap();

    assert_eq!(file.id, file_data.id);
    assert_eq!(file.file_name, "test.txt");
    assert_eq!(file.file_path, "/tmp/test.txt");
    assert_eq!(file.file_size, 100);
    assert_eq!(file.conversation_id, "1");
    assert_eq!(file.user_id, USER);

    let file = repos.files.get_file(&file.id, USER).await.unwrap().unwrap();
    assert_eq!(file.file_name, file_data.file_name);
    assert_eq!(file.file_path, file_data.file_path);
    assert_eq!(file.file_size, file_data.file_size);
    assert_eq!(file.conversation_id, file_data.conversation_id);
    assert_eq!(file.user_id, file_data.user_id);
}

#[tokio::test]
async fn test_fail_get_nonexistent_file() {
    let pool = setup_test_db().await;
    let repos = repositories(&pool);

    let file = repos.files.get_file("123", USER).await.unwrap();
    assert!(file.is_none());
}

#[tokio::test]
async fn test_get_file_of_other_user_is_absent() {
    let pool = setup_test_db().await;
    let repos = repositories(&pool);
    seed_conversation(&repos, "1", USER).await;

    let file = repos
        .files
        .create_file(File::new(USER, "1", "test.txt", "/tmp/test.txt", 100))
        .await
        .unwrap();

    assert!(repos.files.get_file(&file.id, OTHER_USER).await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_files() {
    let pool = setup_test_db().await;
    let repos = repositories(&pool);
    seed_conversation(&repos, "1", USER).await;

    repos
        .files
        .create_file(File::new(USER, "1", "test.txt", "/tmp/test.txt", 10))
        .await
        .unwrap();

    let files = repos.files.list_files(USER, Pagination::default()).await.unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].file_name, "test.txt");

    let files = repos
        .files
        .list_files(OTHER_USER, Pagination::default())
        .await
        .unwrap();
    assert!(files.is_empty());
}

#[tokio::test]
async fn test_list_files_empty() {
    let pool = setup_test_db().await;
    let repos = repositories(&pool);

    let files = repos.files.list_files(USER, Pagination::default()).await.unwrap();
    assert_eq!(files.len(), 0);
}

#[tokio::test]
async fn test_list_files_with_pagination() {
    let pool = setup_test_db().await;
    let repos = repositories(&pool);
    seed_conversation(&repos, "1", USER).await;

    for i in 0..10 {
        repos
            .files
            .create_file(File::new(USER, "1", format!("test.txt {i}"), "/tmp", i))
            .await
            .unwrap();
    }

    let files = repos
        .files
        .list_files(USER, Pagination::new(5, 5))
        .await
        .unwrap();
    assert_eq!(files.len(), 5);

    for (i, file) in files.iter().enumerate() {
        assert_eq!(file.file_name, format!("test.txt {}", i + 5));
    }
}

#[tokio::test]
async fn test_list_files_beyond_end_is_empty() {
    let pool = setup_test_db().await;
    let repos = repositories(&pool);
    seed_conversation(&repos, "1", USER).await;

    for i in 0..3 {
        repos
            .files
            .create_file(File::new(USER, "1", format!("test.txt {i}"), "/tmp", i))
            .await
            .unwrap();
    }

    let files = repos
        .files
        .list_files(USER, Pagination::new(10, 5))
        .await
        .unwrap();
    assert!(files.is_empty());

    // negative bounds are clamped rather than treated as unlimited
    let files = repos
        .files
        .list_files(USER, Pagination::new(-3, -1))
        .await
        .unwrap();
    assert!(files.is_empty());
}

#[tokio::test]
async fn test_list_files_by_conversation_id() {
    let pool = setup_test_db().await;
    let repos = repositories(&pool);
    seed_conversation(&repos, "1", USER).await;
    seed_conversation(&repos, "2", USER).await;

    for i in 0..10 {
        repos
            .files
            .create_file(File::new(USER, "1", format!("test.txt {i}"), "/tmp", i))
            .await
            .unwrap();
    }
    repos
        .files
        .create_file(File::new(USER, "2", "elsewhere.txt", "/tmp", 1))
        .await
        .unwrap();

    let files = repos
        .files
        .list_files_by_conversation("1", USER)
        .await
        .unwrap();
    assert_eq!(files.len(), 10);

    for (i, file) in files.iter().enumerate() {
        assert_eq!(file.file_name, format!("test.txt {i}"));
        assert_eq!(file.conversation_id, "1");
    }
}

#[tokio::test]
async fn test_list_files_by_conversation_id_empty() {
    let pool = setup_test_db().await;
    let repos = repositories(&pool);
    seed_conversation(&repos, "1", USER).await;

    let files = repos
        .files
        .list_files_by_conversation("1", USER)
        .await
        .unwrap();
    assert_eq!(files.len(), 0);
}

#[tokio::test]
async fn test_get_files_by_ids() {
    let pool = setup_test_db().await;
    let repos = repositories(&pool);
    seed_conversation(&repos, "1", USER).await;
    seed_conversation(&repos, "2", OTHER_USER).await;

    let first = repos
        .files
        .create_file(File::new(USER, "1", "a.txt", "/tmp/a.txt", 1))
        .await
        .unwrap();
    repos
        .files
        .create_file(File::new(USER, "1", "b.txt", "/tmp/b.txt", 2))
        .await
        .unwrap();
    let third = repos
        .files
        .create_file(File::new(USER, "1", "c.txt", "/tmp/c.txt", 3))
        .await
        .unwrap();
    let foreign = repos
        .files
        .create_file(File::new(OTHER_USER, "2", "d.txt", "/tmp/d.txt", 4))
        .await
        .unwrap();

    let ids = vec![
        third.id.clone(),
        first.id.clone(),
        foreign.id.clone(),
        "missing".to_owned(),
    ];
    let files = repos.files.get_files_by_ids(&ids, USER).await.unwrap();

    let names: Vec<&str> = files.iter().map(|file| file.file_name.as_str()).collect();
    assert_eq!(names, ["a.txt", "c.txt"]);

    assert!(repos.files.get_files_by_ids(&[], USER).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_file() {
    let pool = setup_test_db().await;
    let repos = repositories(&pool);
    seed_conversation(&repos, "1", USER).await;

    let file = repos
        .files
        .create_file(File::new(USER, "1", "test.txt", "/tmp/test.txt", 100))
        .await
        .unwrap();

    let new_file_data = UpdateFile {
        file_name: Some("new_name.txt".to_owned()),
        ..Default::default()
    };

    let updated_file = repos
        .files
        .update_file(&file.id, USER, new_file_data)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated_file.file_name, "new_name.txt");
    assert_eq!(updated_file.file_path, file.file_path);
    assert_eq!(updated_file.file_size, file.file_size);
    assert_eq!(updated_file.conversation_id, file.conversation_id);
    assert_eq!(updated_file.user_id, file.user_id);
    assert!(updated_file.updated_at >= file.updated_at);
}

#[tokio::test]
async fn test_update_file_of_other_user_is_absent() {
    let pool = setup_test_db().await;
    let repos = repositories(&pool);
    seed_conversation(&repos, "1", USER).await;

    let file = repos
        .files
        .create_file(File::new(USER, "1", "test.txt", "/tmp/test.txt", 100))
        .await
        .unwrap();

    let update = UpdateFile {
        file_name: Some("hijacked.txt".to_owned()),
        ..Default::default()
    };
    let updated = repos
        .files
        .update_file(&file.id, OTHER_USER, update)
        .await
        .unwrap();
    assert!(updated.is_none());

    let file = repos.files.get_file(&file.id, USER).await.unwrap().unwrap();
    assert_eq!(file.file_name, "test.txt");
}

#[tokio::test]
async fn test_delete_file() {
    let pool = setup_test_db().await;
    let repos = repositories(&pool);
    seed_conversation(&repos, "1", USER).await;

    let file = repos
        .files
        .create_file(File::new(USER, "1", "test.txt", "/tmp/test.txt", 100))
        .await
        .unwrap();

    assert!(repos.files.delete_file(&file.id, USER).await.unwrap());
    assert!(repos.files.get_file(&file.id, USER).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_file_nonexistent_is_noop() {
    let pool = setup_test_db().await;
    let repos = repositories(&pool);

    assert!(!repos.files.delete_file("123", USER).await.unwrap());
}

#[tokio::test]
async fn test_delete_file_of_other_user_keeps_it() {
    let pool = setup_test_db().await;
    let repos = repositories(&pool);
    seed_conversation(&repos, "1", USER).await;

    let file = repos
        .files
        .create_file(File::new(USER, "1", "test.txt", "/tmp/test.txt", 100))
        .await
        .unwrap();

    assert!(!repos.files.delete_file(&file.id, OTHER_USER).await.unwrap());
    assert!(repos.files.get_file(&file.id, USER).await.unwrap().is_some());
}
