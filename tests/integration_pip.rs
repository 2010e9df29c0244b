use vidctl::platform::{PictureInPictureApi, SimulatedPlatform};
use vidctl::{ControlsConfig, Error, Event, EventSource};

#[tokio::test]
async fn pip_request_disables_button_until_settled() {
    let p = SimulatedPlatform::new();
    let mut sync = vidctl::new_synchronizer(&p, ControlsConfig::default()).unwrap();

    let task = sync
        .dispatch(EventSource::PipButton, &Event::Click)
        .expect("request should start");
    assert!(task.entering());
    assert!(sync.controls().pip.is_disabled());

    // A second activation while pending is ignored
    assert!(sync.handle_keyboard_shortcut("p").is_none());

    task.run().await.unwrap();
    assert!(!sync.controls().pip.is_disabled());
    assert!(p.pip.is_active());

    sync.toggle_picture_in_picture().await;
    assert!(!p.pip.is_active());
    assert!(!sync.controls().pip.is_disabled());
}

#[tokio::test]
async fn rejected_pip_request_only_reenables_button() {
    let p = SimulatedPlatform::new();
    p.pip.reject_requests(true);
    let mut sync = vidctl::new_synchronizer(&p, ControlsConfig::default()).unwrap();
    let before = sync.controls().clone();

    let task = sync.handle_keyboard_shortcut("p").expect("request should start");
    let res = task.run().await;
    assert!(matches!(res, Err(Error::PictureInPicture(_))));

    assert!(!sync.controls().pip.is_disabled());
    assert!(!p.pip.is_active());
    assert_eq!(sync.controls(), &before);
}

#[tokio::test]
async fn dropped_pip_task_reenables_button() {
    let p = SimulatedPlatform::new();
    let mut sync = vidctl::new_synchronizer(&p, ControlsConfig::default()).unwrap();
    let task = sync.begin_picture_in_picture().unwrap();
    assert!(sync.controls().pip.is_disabled());
    drop(task);
    assert!(!sync.controls().pip.is_disabled());
}

#[tokio::test]
async fn async_handle_survives_pip_rejection() {
    let p = SimulatedPlatform::new();
    p.pip.reject_requests(true);
    let handle = vidctl::ControlsHandle::new(p.clone(), ControlsConfig::default())
        .await
        .unwrap();
    handle.dispatch(EventSource::PipButton, Event::Click).await.unwrap();
    let c = handle.snapshot().await.unwrap();
    assert!(!c.pip.is_disabled());
    handle.close().await.unwrap();
}
