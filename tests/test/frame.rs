//local shortcuts
use chat_relay::*;

//third-party shortcuts

//standard shortcuts


//-------------------------------------------------------------------------------------------------------------------
//-------------------------------------------------------------------------------------------------------------------

#[tokio::test]
async fn frames_are_length_prefixed()
{
    let envelope = Envelope::chat("Alice", "hello");
    let frame = encode_envelope(&envelope, 1_000).unwrap();

    let declared = u32::from_be_bytes([frame[0], frame[1], frame[2], frame[3]]);
    assert_eq!(declared as usize, frame.len() - FRAME_HEADER_BYTES);
    assert_eq!(decode_envelope(&frame[FRAME_HEADER_BYTES..], 1_000).unwrap(), envelope);

    // consecutive frames on one stream
    let second = Envelope::login("alice", "pw1");
    let mut bytes = frame.clone();
    bytes.extend(encode_envelope(&second, 1_000).unwrap());

    let mut reader: &[u8] = &bytes;
    assert_eq!(read_envelope(&mut reader, 1_000).await.unwrap(), Some(envelope));
    assert_eq!(read_envelope(&mut reader, 1_000).await.unwrap(), Some(second));
    assert_eq!(read_envelope(&mut reader, 1_000).await.unwrap(), None);
}

//-------------------------------------------------------------------------------------------------------------------

#[tokio::test]
async fn write_then_read()
{
    let envelope = Envelope::register("eve", "secret", "Eve");
    let mut buffer: Vec<u8> = Vec::new();
    write_envelope(&mut buffer, &envelope, 1_000).await.unwrap();

    let mut reader: &[u8] = &buffer;
    assert_eq!(read_envelope(&mut reader, 1_000).await.unwrap(), Some(envelope));
}

//-------------------------------------------------------------------------------------------------------------------

#[tokio::test]
async fn multi_byte_text_survives_framing()
{
    let chat = Envelope::chat("小明", "欢迎回来，小明 👋").with_receiver("Ünïcødé");
    let register = Envelope::register("xiaoming", "密码🔑", "小明");

    // the length prefix counts bytes, not characters
    let frame = encode_envelope(&chat, 1_000).unwrap();
    let declared = u32::from_be_bytes([frame[0], frame[1], frame[2], frame[3]]);
    assert_eq!(declared as usize, frame.len() - FRAME_HEADER_BYTES);
    assert!(declared as usize > chat.content.chars().count() + chat.sender.chars().count());

    let mut buffer: Vec<u8> = Vec::new();
    write_envelope(&mut buffer, &chat, 1_000).await.unwrap();
    write_envelope(&mut buffer, &register, 1_000).await.unwrap();

    let mut reader: &[u8] = &buffer;
    let received = read_envelope(&mut reader, 1_000).await.unwrap().unwrap();
    assert_eq!(received.sender, "小明");
    assert_eq!(received.content, "欢迎回来，小明 👋");
    assert_eq!(received.receiver.as_deref(), Some("Ünïcødé"));

    let received = read_envelope(&mut reader, 1_000).await.unwrap().unwrap();
    assert_eq!(
            parse_register_content(&received.content),
            Some(RegisterCredentials{
                username: String::from("xiaoming"),
                password: String::from("密码🔑"),
                nickname: String::from("小明"),
            })
        );
}

//-------------------------------------------------------------------------------------------------------------------

#[tokio::test]
async fn clean_eof_is_not_an_error()
{
    let mut reader: &[u8] = &[];
    assert!(read_envelope(&mut reader, 1_000).await.unwrap().is_none());
}

//-------------------------------------------------------------------------------------------------------------------

#[tokio::test]
async fn truncated_frame_is_an_error()
{
    let frame = encode_envelope(&Envelope::chat("Alice", "hello"), 1_000).unwrap();
    let mut reader: &[u8] = &frame[..frame.len() - 2];
    assert!(matches!(read_envelope(&mut reader, 1_000).await, Err(FrameError::Io(_))));

    // partial header
    let mut reader: &[u8] = &frame[..2];
    assert!(read_envelope(&mut reader, 1_000).await.unwrap().is_none());
}

//-------------------------------------------------------------------------------------------------------------------

#[tokio::test]
async fn oversized_frames_are_rejected()
{
    // declared length over the limit
    let header = 2_000u32.to_be_bytes();
    let mut reader: &[u8] = &header;
    assert!(matches!(read_envelope(&mut reader, 1_000).await, Err(FrameError::Oversized(2_000))));

    // encoding past the limit
    let envelope = Envelope::chat("Alice", "x".repeat(2_000));
    assert!(matches!(encode_envelope(&envelope, 1_000), Err(FrameError::Oversized(_))));

    let mut buffer: Vec<u8> = Vec::new();
    assert!(matches!(write_envelope(&mut buffer, &envelope, 1_000).await, Err(FrameError::Oversized(_))));
    assert!(buffer.is_empty());
}

//-------------------------------------------------------------------------------------------------------------------

#[test]
fn garbage_payload_fails_to_decode()
{
    assert!(matches!(decode_envelope(&[200u8], 1_000), Err(FrameError::Decode)));
    assert!(matches!(decode_envelope(&[], 1_000), Err(FrameError::Decode)));
}

//-------------------------------------------------------------------------------------------------------------------

#[test]
fn credential_content()
{
    assert_eq!(
            parse_login_content("alice|pw1"),
            Some(LoginCredentials{ username: String::from("alice"), password: String::from("pw1") })
        );
    assert_eq!(parse_login_content("alice"), None);
    assert_eq!(parse_login_content("alice|pw1|extra"), None);
    assert_eq!(parse_login_content("|pw1"), None);
    assert_eq!(parse_login_content("alice|"), None);

    assert_eq!(
            parse_register_content("eve|secret|Eve"),
            Some(RegisterCredentials{
                username: String::from("eve"),
                password: String::from("secret"),
                nickname: String::from("Eve"),
            })
        );
    assert_eq!(parse_register_content("eve|secret"), None);
    assert_eq!(parse_register_content("eve||Eve"), None);

    // builders and parsers agree
    let login = Envelope::login("alice", "pw1");
    assert_eq!(login.kind, EnvelopeKind::Login);
    assert!(parse_login_content(&login.content).is_some());
    let register = Envelope::register("eve", "secret", "Eve");
    assert!(parse_register_content(&register.content).is_some());
}

//-------------------------------------------------------------------------------------------------------------------

#[test]
fn receiver_defaults_to_broadcast()
{
    let envelope = Envelope::new(EnvelopeKind::Chat, "Alice", "hi");
    assert_eq!(envelope.receiver_or_broadcast(), BROADCAST_RECEIVER);
    assert_eq!(ChatLogEntry::from_envelope(&envelope).receiver, BROADCAST_RECEIVER);

    let envelope = envelope.with_receiver("Bob");
    assert_eq!(envelope.receiver_or_broadcast(), "Bob");
}

//-------------------------------------------------------------------------------------------------------------------
