use proptest::prelude::*;

use dupc::{
    args::{
        format_hex,
        parse_hex,
    },
    message::{
        self,
        builder::{
            build_payload,
            total_length,
        },
        header::{
            CommandType,
            ModuleInfo,
        },
        interpret,
        payload::{
            general,
            Limits,
            ParamDefinition,
            ParamDefinitionRequest,
            VersionInquiryResponse,
        },
        BuildOptions,
        CommandSet,
        DeviceType,
        Direction,
        EncryptType,
        Error,
        Fields,
        Payload,
        Resolution,
    },
};

mod common;

#[test]
fn known_vector() -> eyre::Result<()> {
    common::trace_init();

    let packet = message::build(&BuildOptions::default(), &common::known_fields(), &[])?;
    assert_eq!(format_hex(&packet), common::KNOWN_PACKET);

    let pkt = interpret(&parse_hex(common::KNOWN_PACKET)?)?;
    assert_eq!(pkt.header.seq, 3);
    pkt.verify_standard()?;

    Ok(())
}

#[test]
fn catalog_records_round_trip() -> eyre::Result<()> {
    common::trace_init();

    let mut version = VersionInquiryResponse {
        unknown0:    0,
        unknown1:    0,
        hw_version:  [0; 16],
        ldr_version: 0x01010000,
        app_version: 0x03020100,
        unknown1a:   0,
        unknown1e:   0,
    };
    version.set_hw_version("wm330");

    let records = [
        Payload::VersionInquiry(version),
        Payload::ParamDefinitionRequest(ParamDefinitionRequest {
            index: 42,
        }),
        Payload::ParamDefinition(ParamDefinition {
            status:    0,
            type_id:   8,
            size:      4,
            attribute: 0,
            limits:    Limits::Float {
                min:     -1.0,
                max:     1.0,
                default: 0.25,
            },
            name:      b"g_config_flying_limit".to_vec(),
        }),
    ];

    for record in records {
        let buf = build_payload(&BuildOptions::strict(), &common::known_fields(), &record)?;
        let pkt = interpret(&buf)?;

        pkt.verify_standard()?;
        assert_eq!(pkt.routing_key(), record.routing_key());
        assert_eq!(pkt.resolution, Resolution::Known(record));
    }

    Ok(())
}

#[test]
fn truncated_version_inquiry_is_unrecognized() -> eyre::Result<()> {
    let key = general::VERSION_INQUIRY;
    let fields = Fields {
        ty: CommandType {
            direction: key.direction,
            ..Default::default()
        },
        cmd_set: key.cmd_set,
        cmd_id: key.cmd_id,
        ..common::known_fields()
    };

    let pkt = interpret(&message::build(&BuildOptions::default(), &fields, &[0; 12])?)?;
    assert_eq!(pkt.resolution, Resolution::UnrecognizedPayloadShape);

    Ok(())
}

#[test]
fn unknown_command() -> eyre::Result<()> {
    let fields = Fields {
        ty: CommandType {
            direction: Direction::Response,
            ..Default::default()
        },
        cmd_set: CommandSet::CAMERA,
        cmd_id: 0x99,
        ..common::known_fields()
    };

    let pkt = interpret(&message::build(&BuildOptions::default(), &fields, &[1, 2, 3])?)?;
    assert_eq!(pkt.resolution, Resolution::UnrecognizedCommand);
    assert_eq!(pkt.payload.as_slice(), &[1, 2, 3]);

    Ok(())
}

#[test]
fn strict_mode() {
    let mut fields = common::known_fields();
    fields.ty.encrypt = EncryptType(9);

    assert!(matches!(
        message::build(&BuildOptions::strict(), &fields, &[]),
        Err(Error::FieldRange {
            field: "encrypt type",
            ..
        })
    ));

    assert_eq!(
        message::build(&BuildOptions::strict(), &common::known_fields(), &[0; 2000]),
        Err(Error::LengthOverflow {
            total: 2013,
        })
    );
}

#[test]
fn overflowed_length_fails_to_interpret() -> eyre::Result<()> {
    let buf = message::build(&BuildOptions::default(), &common::known_fields(), &[0; 1100])?;

    assert_eq!(
        interpret(&buf),
        Err(Error::LengthMismatch {
            declared: total_length(1100) & 0x3ff,
            actual:   total_length(1100),
        })
    );

    Ok(())
}

fn arb_module() -> impl Strategy<Value = ModuleInfo> {
    (0u8..32, 0u8..8).prop_map(|(ty, idx)| ModuleInfo::new(DeviceType(ty), idx))
}

fn arb_fields() -> impl Strategy<Value = Fields> {
    let routing = (arb_module(), arb_module(), any::<u16>());
    let command = (any::<bool>(), 0u8..4, 0u8..8, any::<u8>(), any::<u8>());

    (routing, command).prop_map(|((sender, receiver, seq), (response, ack, enc, set, id))| Fields {
        sender,
        receiver,
        seq,
        ty: CommandType {
            direction: if response { Direction::Response } else { Direction::Request },
            ack: message::AckType(ack),
            encrypt: EncryptType(enc),
            reserved: 0,
        },
        cmd_set: CommandSet(set),
        cmd_id: id,
    })
}

proptest! {
    #[test]
    fn build_then_interpret(
        fields in arb_fields(),
        payload in proptest::collection::vec(any::<u8>(), 0..=256),
    ) {
        let buf = message::build(&BuildOptions::strict(), &fields, &payload).unwrap();
        prop_assert_eq!(buf.len(), total_length(payload.len()));

        let pkt = interpret(&buf).unwrap();
        prop_assert_eq!(pkt.header.sender, fields.sender);
        prop_assert_eq!(pkt.header.receiver, fields.receiver);
        prop_assert_eq!(pkt.header.seq, fields.seq);
        prop_assert_eq!(pkt.header.ty, fields.ty);
        prop_assert_eq!(pkt.header.cmd_set, fields.cmd_set);
        prop_assert_eq!(pkt.header.cmd_id, fields.cmd_id);
        prop_assert_eq!(pkt.payload.as_slice(), payload.as_slice());
        prop_assert!(pkt.verify_standard().is_ok());
    }

    #[test]
    fn sender_index_wraps(fields in arb_fields(), extra in 1u8..=31) {
        let wide = Fields {
            sender: ModuleInfo::new(fields.sender.device, fields.sender.index + 8 * extra),
            ..fields
        };

        prop_assert_eq!(
            message::build(&BuildOptions::default(), &wide, &[]).unwrap(),
            message::build(&BuildOptions::default(), &fields, &[]).unwrap(),
        );
    }
}
